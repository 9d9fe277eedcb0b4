use pomoclock_core::Config;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let scheduler = config.scheduler()?;
    println!("{}", serde_json::to_string_pretty(&scheduler.snapshot())?);
    Ok(())
}
