extern crate taqvim as lib;

use flexi_logger::{FileSpec, Logger};
use lib::jalali::JalaliDate;
use lib::picker::{DatePicker, Tap};
use std::path::PathBuf;
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "tq",
    author = "reedts <j.reedts@gmail.com>",
    about = "Taqvim - A Jalali month picker."
)]
pub struct Args {
    #[structopt(
        name = "CONFIG",
        short = "c",
        long = "config",
        help = "path to config file",
        parse(from_os_str)
    )]
    pub configfile: Option<PathBuf>,

    #[structopt(long = "log-file", help = "path to log file", parse(from_os_str))]
    pub log_file: Option<PathBuf>,

    #[structopt(subcommand)]
    pub cmd: Command,
}

#[derive(Debug, StructOpt)]
pub enum Command {
    #[structopt(about = "show a month, the current one by default")]
    Show {
        #[structopt(short = "t", long = "tokens", help = "print the token of every button")]
        tokens: bool,

        #[structopt(name = "YEAR", requires = "MONTH")]
        year: Option<i32>,

        #[structopt(name = "MONTH")]
        month: Option<u32>,
    },
    #[structopt(about = "resolve a button token")]
    Tap {
        #[structopt(name = "TOKEN")]
        token: String,

        #[structopt(short = "t", long = "tokens", help = "print the token of every button")]
        tokens: bool,
    },
    #[structopt(about = "print today's date")]
    Today,
    #[structopt(about = "list the loaded holidays")]
    Holidays {
        #[structopt(name = "YEAR")]
        year: Option<i32>,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::from_args();

    const DEFAULT_LOG_LEVEL: &str = if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    };

    let mut logger = Logger::try_with_env_or_str(DEFAULT_LOG_LEVEL)?;

    if let Some(log_file) = args.log_file {
        logger = logger
            .log_to_file(FileSpec::try_from(log_file)?)
            .print_message();
    }

    let _logger = logger.start()?;

    std::panic::set_hook(Box::new(|info| {
        println!("Taqvim ran into a fatal error!");
        println!(
            "Consider filing an issue with a log file and the backtrace below at {}",
            env!("CARGO_PKG_REPOSITORY")
        );

        println!("{}", info);
        println!("{:?}", backtrace::Backtrace::new());
    }));

    let config = lib::config::load_suitable_config(args.configfile.as_deref())?;
    let picker = DatePicker::from_config(&config)?;

    match args.cmd {
        Command::Show {
            tokens,
            year,
            month,
        } => {
            let rendered = picker.render_month(year, month)?;
            println!("{}", picker.prompt(JalaliDate::today()));
            println!("{}", rendered.keyboard.render(tokens));
        }
        Command::Tap { token, tokens } => match picker.handle_tap(&token) {
            Tap::Resolved(date) => println!("{}", date),
            Tap::NewGrid(rendered) => println!("{}", rendered.keyboard.render(tokens)),
            Tap::Ignored => println!("ignored"),
        },
        Command::Today => {
            let today = JalaliDate::today();
            println!("{} ({})", today, today.to_gregorian()?);
        }
        Command::Holidays { year } => {
            for (date, label) in picker
                .holidays()
                .iter()
                .filter(|(date, _)| year.map_or(true, |y| date.year() == y))
            {
                println!("{}\t{}", date, label);
            }
            for err in picker.holidays().load_errors() {
                eprintln!("{}", err);
            }
        }
    }

    Ok(())
}
