use super::{print_json, Workspace};

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let ws = Workspace::open()?;
    print_json(&ws.engine.snapshot())?;
    Ok(())
}
