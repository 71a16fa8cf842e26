//! The `lexiquiz init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    if std::path::Path::new("lexiquiz.toml").exists() {
        println!("lexiquiz.toml already exists, skipping.");
    } else {
        std::fs::write("lexiquiz.toml", SAMPLE_CONFIG)?;
        println!("Created lexiquiz.toml");
    }

    println!("\nNext steps:");
    println!("  1. Export GEMINI_API_KEY (or edit lexiquiz.toml)");
    println!("  2. Run: lexiquiz quiz --mode grammar --topic \"Present Perfect\"");
    println!("  3. Run: lexiquiz write --length short");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# lexiquiz configuration

default_provider = "gemini"
default_model = "gemini-2.5-flash"
default_temperature = 0.7

[providers.gemini]
type = "gemini"
api_key = "${GEMINI_API_KEY}"

[providers.openai]
type = "openai"
api_key = "${OPENAI_API_KEY}"
"#;
