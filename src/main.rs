use std::error::Error;

use clap::Parser as ClapParser;
use tracing::info;

use tixy::app::App;
use tixy::config::{share_command, Config};
use tixy::display::TermDisplay;
use tixy::input::StdinInput;
use tixy::logging;

fn main() -> Result<(), Box<dyn Error>> {
    // initialise
    let config = Config::parse();
    logging::init(config.log_file.as_deref())?;
    let (source, import_error) = config.initial_source();
    info!(code = %source, fps = config.fps(), "starting");

    let submitted = {
        // the display restores the terminal when it goes out of scope
        let mut display = TermDisplay::new()?;
        let mut input = StdinInput::new();
        let mut app = App::new(&source, &mut display, &mut input);
        if let Some(error) = &import_error {
            app.report_import_error(error);
        }
        app.run(config.fps())?;
        app.submitted().map(str::to_owned)
    };

    if let Some(code) = submitted {
        println!("{}", share_command(&code));
    }
    Ok(())
}
