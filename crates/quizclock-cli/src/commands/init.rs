//! The `quizclock init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    if std::path::Path::new("quizclock.toml").exists() {
        println!("quizclock.toml already exists, skipping.");
    } else {
        std::fs::write("quizclock.toml", SAMPLE_CONFIG)?;
        println!("Created quizclock.toml");
    }

    std::fs::create_dir_all("banks")?;
    let example_path = std::path::Path::new("banks/example.toml");
    if example_path.exists() {
        println!("banks/example.toml already exists, skipping.");
    } else {
        std::fs::write(example_path, EXAMPLE_BANK)?;
        println!("Created banks/example.toml");
    }

    println!("\nNext steps:");
    println!("  1. Run: quizclock validate --bank banks/example.toml");
    println!("  2. Run: quizclock take --bank banks/example.toml");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# quizclock configuration

# Time limit when neither --duration nor the bank sets one.
default_duration_secs = 600

# Where `quizclock take` saves attempts.
output_dir = "./quizclock-results"

# Uncomment to replace the default A-F table. A band starting at 0 is required.
# [[grade_bands]]
# min_percent = 50
# grade = "A"
# feedback = "Pass"
#
# [[grade_bands]]
# min_percent = 0
# grade = "F"
# feedback = "Not yet. Review and try again."
"#;

const EXAMPLE_BANK: &str = r#"[bank]
id = "example"
name = "Example Bank"
description = "A short bank to get started"
duration_secs = 120

[[questions]]
id = "capital"
type = "single-choice"
prompt = "What is the capital of France?"
options = ["Berlin", "Paris", "Madrid"]
correct_answer = "Paris"
explanation = "Paris has been the capital since 987."
difficulty = "easy"
category = "geography"

[[questions]]
id = "primes"
type = "multi-select"
prompt = "Which of these are prime?"
options = ["2", "4", "5", "9"]
correct_answer = ["2", "5"]
explanation = "4 and 9 are squares."
category = "math"
points = 2

[[questions]]
id = "earth-flat"
type = "true-false"
prompt = "The Earth is flat."
options = ["True", "False"]
correct_answer = "False"
explanation = "It is an oblate spheroid."
category = "science"

[[questions]]
id = "h2o"
type = "short-answer"
prompt = "Chemical formula for water?"
correct_answer = "H2O"
explanation = "Two hydrogen atoms and one oxygen."
category = "science"
"#;
