use gangplan::application::dto::InputDto;
use gangplan::application::mappers;
use gangplan::GangingOptimizer;
use std::io;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(io::stderr)
        .init();

    let mut args = std::env::args().skip(1);
    let Some(input_path) = args.next() else {
        eprintln!("Usage: gangplan <input.json> [output.json]");
        std::process::exit(2);
    };
    let output_path = args.next();

    let raw = std::fs::read_to_string(&input_path)?;
    let dto: InputDto = serde_json::from_str(&raw)?;
    let request = mappers::request_from_dto(dto)?;

    let outcome = GangingOptimizer::new().optimize(&request)?;
    let output = mappers::output_from_outcome(&outcome);
    let rendered = serde_json::to_string_pretty(&output)?;

    match output_path {
        Some(path) => std::fs::write(path, rendered)?,
        None => println!("{rendered}"),
    }

    Ok(())
}
