use crate::support::client_or_exit;
use serde_json::json;
use tagmend_inventory::InventorySource;

pub fn run(json_output: bool) {
    let mut client = client_or_exit();
    let boundaries = client.list_boundaries().unwrap_or_else(|e| {
        eprintln!("error: {e}");
        std::process::exit(1);
    });

    if json_output {
        let payload = json!({
            "boundaryCount": boundaries.len(),
            "boundaries": boundaries,
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&payload).expect("json serialization")
        );
    } else {
        for boundary in &boundaries {
            println!("{}  {}", boundary.id, boundary.name);
        }
        println!("{} boundaries", boundaries.len());
    }
}
