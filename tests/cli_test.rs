//! Exit status of the binary when it cannot start

use std::process::Command;

fn binary() -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_product_agent"));
    // Keep a developer's .env.local out of the picture
    command
        .current_dir(std::env::temp_dir())
        .env("PRODUCT_AGENT_ENV_FILE", "/nonexistent/product_agent.env")
        .env_remove("GOOGLE_API_KEY")
        .env_remove("NEXT_PUBLIC_SUPABASE_URL")
        .env_remove("NEXT_PUBLIC_SUPABASE_ANON_KEY");
    command
}

#[test]
fn missing_api_key_exits_with_status_one() {
    let output = binary().output().expect("run binary");

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Error: GOOGLE_API_KEY missing."), "{}", stderr);
    assert!(output.stdout.is_empty());
}

#[test]
fn unsupported_store_endpoint_exits_with_status_one() {
    let output = binary()
        .env("GOOGLE_API_KEY", "test-key")
        .env("NEXT_PUBLIC_SUPABASE_URL", "ftp://files.example.com")
        .output()
        .expect("run binary");

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Error: Invalid store endpoint"), "{}", stderr);
}

#[test]
fn model_failure_exits_with_status_one() {
    // Nothing listens on port 1, so the first model call fails
    let output = binary()
        .env("GOOGLE_API_KEY", "test-key")
        .env("GEMINI_BASE_URL", "http://127.0.0.1:1")
        .output()
        .expect("run binary");

    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("User: I want to renovate my bathroom"), "{}", stdout);
    assert!(stdout.contains("\nAPI Error: "), "{}", stdout);
}

#[test]
fn recommend_without_criteria_exits_with_status_one() {
    let output = binary()
        .env("GOOGLE_API_KEY", "test-key")
        .args(["recommend", "--budget", "300"])
        .output()
        .expect("run binary");

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Error: Description or category is required"), "{}", stderr);
    assert!(output.stdout.is_empty());
}
