use kontolib::{
    formats::{json::Json, mt940::Mt940},
    traits::{ReadFormat, WriteFormat},
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Пример: MT940 (Latin-1) -> JSON (stdin -> stdout)
    let soa = Mt940::read(std::io::BufReader::new(std::io::stdin()))?;
    Json::write(std::io::stdout(), &soa)?;
    Ok(())
}
