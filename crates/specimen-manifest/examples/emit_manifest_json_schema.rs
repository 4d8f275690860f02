use specimen_manifest::manifest_json_schema;

fn main() {
    let schema = manifest_json_schema().expect("derive manifest json schema");
    let json = serde_json::to_string_pretty(&schema).expect("serialize manifest json schema");
    println!("{json}");
}
