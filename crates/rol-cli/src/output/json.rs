use serde::Serialize;

pub fn print<T: Serialize + ?Sized>(value: &T) -> Result<(), serde_json::Error> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{json}");
    Ok(())
}
