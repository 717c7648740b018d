//! The `marksheet init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    if std::path::Path::new("marksheet.toml").exists() {
        println!("marksheet.toml already exists, skipping.");
    } else {
        std::fs::write("marksheet.toml", SAMPLE_CONFIG)?;
        println!("Created marksheet.toml");
    }

    if std::path::Path::new("snapshot.json").exists() {
        println!("snapshot.json already exists, skipping.");
    } else {
        std::fs::write("snapshot.json", SAMPLE_SNAPSHOT)?;
        println!("Created snapshot.json");
    }

    println!("\nNext steps:");
    println!("  1. Run: marksheet validate");
    println!("  2. Run: marksheet lookup --enrollment E1 --access-code code1");
    println!("  3. Point marksheet.toml at your Google Sheet");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# marksheet configuration

[source]
type = "file"
path = "snapshot.json"

# To read a live Google Sheet instead:
#
# [source]
# type = "google"
# spreadsheet_id = "${MARKSHEET_SPREADSHEET_ID}"
# api_key = "${GOOGLE_API_KEY}"

[layout]
assignments = "Sheet1!A1:E500"
marks = "Sheet1!H1:H500"
credentials = "Credentials!A1:B500"
"#;

const SAMPLE_SNAPSHOT: &str = r#"{
  "Sheet1!A1:E500": [
    ["Enrollment", "Name", "Batch", "Phone", "Assignment"],
    ["E1", "Alice", "-", "555-1234", "1"],
    ["E1", "Alice", "-", "555-1234", "1"],
    ["E1", "Alice", "-", "555-1234", "2"],
    ["E3", "Bob", "-", "555-9876", "1"],
    ["E3", "Bob", "-", "555-9876", "2"]
  ],
  "Sheet1!H1:H500": [
    ["Marks"],
    ["70"],
    ["85"],
    [""],
    ["pending"],
    ["90"]
  ],
  "Credentials!A1:B500": [
    ["Enrollment", "Access Code"],
    ["E1", "code1"],
    ["E2", "code2"],
    ["E3", "code3"]
  ]
}
"#;
