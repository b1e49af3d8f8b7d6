use clap::Parser;

use zettings_cli::Args;

fn main() {
    env_logger::init();
    let args = Args::parse();

    match zettings_cli::run(&args) {
        Ok(Some(output)) => println!("{}", output),
        Ok(None) => {}
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
