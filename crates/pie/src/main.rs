use clap::Parser;
use pie::config::{self, Overrides};
use pie::gui::app::AppModel;
use pie::gui::chart::State;
use pie::sys::runtime;
use relm4::prelude::*;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Number of dividers (the chart has one more sector)
    #[arg(short, long)]
    dividers: Option<usize>,

    /// The sum shared by all sectors
    #[arg(short, long)]
    total: Option<i64>,

    /// Write the default config file, print its path and exit
    #[arg(long)]
    init_config: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    if args.init_config {
        let path = config::write_default_config()?;
        println!("{}", path.display());
        return Ok(());
    }

    let overrides = Overrides {
        dividers: args.dividers,
        total: args.total,
    };
    let mut config = config::load_or_default();
    overrides.apply(&mut config);
    let state = State::from_config(&config)?;

    let (tx, rx) = async_channel::bounded(32);

    // Start Background Services
    runtime::start_background_services(tx);

    // clap already consumed the command line
    let app = RelmApp::new("org.divvy.pie").with_args(Vec::new());

    app.run::<AppModel>((state, overrides, rx));
    Ok(())
}
