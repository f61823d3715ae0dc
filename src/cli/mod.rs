pub mod parse;
pub mod sheet;

use std::path::PathBuf;

use anyhow::{bail, Result};
use chrono::Local;
use clap::{CommandFactory, Parser, Subcommand};
use tracing::level_filters::LevelFilter;

use crate::{
    frames::store::WatsonFrameFile,
    utils::{
        clock::DefaultClock,
        dir::{create_application_default_path, resolve_watson_dir},
        logging::{enable_logging, CLI_PREFIX},
    },
};

use parse::{parse_datetime, parse_weekday, DateStyle};
use sheet::{process_sheet_action, SheetAction};

#[derive(Parser, Debug)]
#[command(name = "Framesheet", version, long_about = None)]
#[command(about = "Weekly overview and editor for Watson time-tracking frames", long_about = None)]
struct Args {
    #[command(subcommand)]
    commands: Commands,
    #[arg(
        long,
        help = "Watson directory holding the frames file. By default $WATSON_DIR, then the platform Watson config directory"
    )]
    dir: Option<PathBuf>,
    #[arg(long, help = "Disable colors and styling in the rendered sheet")]
    plain: bool,
    #[arg(long, help = "Enable logging")]
    log: bool,
}

#[derive(Subcommand, Debug)]
#[command(version, about, long_about = None)]
enum Commands {
    #[command(about = "Render the weekly sheet")]
    Show,
    #[command(about = "Move the sheet one week back")]
    Prev,
    #[command(about = "Move the sheet one week forward. Refused once the current week is shown")]
    Next,
    #[command(about = "Jump back to the current week")]
    Home,
    #[command(about = "Select one row of the sheet for editing")]
    Select {
        #[arg(help = "Day of the week, e.g. \"mon\" or \"monday\"")]
        day: String,
        #[arg(help = "Row number within that day, as printed by show")]
        row: usize,
    },
    #[command(about = "Edit a field of the selected frame")]
    Edit {
        #[command(subcommand)]
        field: EditField,
    },
    #[command(about = "Delete the selected frame")]
    Delete,
}

#[derive(Subcommand, Debug)]
enum EditField {
    #[command(about = "Move the start of the selected frame. Clamped to the frame's stop")]
    Start {
        #[arg(long, default_value_t = DateStyle::Uk, help = "Style of dates used during parsing. For Uk it's day/month/year. For Us it's month/day/year")]
        date_style: DateStyle,
        #[arg(
            help = "New start. Examples are \"2018-06-11 07:16\", \"yesterday 18:00\", \"2 hours ago\""
        )]
        datetime: String,
    },
    #[command(
        about = "Move the stop of the selected frame. Clamped between the frame's start and the next frame"
    )]
    Stop {
        #[arg(long, default_value_t = DateStyle::Uk, help = "Style of dates used during parsing. For Uk it's day/month/year. For Us it's month/day/year")]
        date_style: DateStyle,
        #[arg(
            help = "New stop. Examples are \"2018-06-11 19:30\", \"yesterday 18:00\", \"2 hours ago\""
        )]
        datetime: String,
    },
    #[command(about = "Rename the project of the selected frame")]
    Project {
        name: String,
    },
    #[command(about = "Replace the message of the selected frame. An empty text clears it")]
    Message {
        text: String,
    },
}

pub fn run_cli() -> Result<()> {
    let args = Args::parse();

    let state_dir = create_application_default_path()?;
    let logging_level = if args.log {
        Some(LevelFilter::TRACE)
    } else {
        None
    };
    enable_logging(CLI_PREFIX, &state_dir, logging_level, args.log)?;

    let action = resolve_action(args.commands)?;
    let storage = WatsonFrameFile::new(resolve_watson_dir(args.dir).join("frames"));

    let output = process_sheet_action(
        &storage,
        &state_dir,
        Box::new(DefaultClock),
        Local,
        !args.plain,
        action,
    )?;
    println!("{output}");
    Ok(())
}

/// Turns the parsed command line into a [SheetAction], resolving weekday
/// names and datetimes. Bad values become clap validation errors.
fn resolve_action(commands: Commands) -> Result<SheetAction> {
    Ok(match commands {
        Commands::Show => SheetAction::Show,
        Commands::Prev => SheetAction::Prev,
        Commands::Next => SheetAction::Next,
        Commands::Home => SheetAction::Home,
        Commands::Select { day, row } => {
            let day = match parse_weekday(&day) {
                Ok(day) => day,
                Err(e) => return Err(validation_error(e)),
            };
            let Some(row) = row.checked_sub(1) else {
                bail!("Row numbers start at 1");
            };
            SheetAction::Select { day, row }
        }
        Commands::Edit { field } => match field {
            EditField::Start {
                date_style,
                datetime,
            } => match parse_datetime(&datetime, Local::now(), date_style) {
                Ok(parsed) => SheetAction::EditStart(parsed.to_utc()),
                Err(e) => return Err(validation_error(e)),
            },
            EditField::Stop {
                date_style,
                datetime,
            } => match parse_datetime(&datetime, Local::now(), date_style) {
                Ok(parsed) => SheetAction::EditStop(parsed.to_utc()),
                Err(e) => return Err(validation_error(e)),
            },
            EditField::Project { name } => SheetAction::EditProject(name.into()),
            EditField::Message { text } => {
                SheetAction::EditMessage((!text.is_empty()).then(|| text.into()))
            }
        },
        Commands::Delete => SheetAction::Delete,
    })
}

fn validation_error(e: anyhow::Error) -> anyhow::Error {
    Args::command()
        .error(clap::error::ErrorKind::ValueValidation, format!("{e}"))
        .into()
}

#[cfg(test)]
mod tests {
    use anyhow::Result;
    use clap::Parser;

    use super::{resolve_action, Args, Commands, SheetAction};

    fn action_for(argv: &[&str]) -> Result<SheetAction> {
        let args = Args::try_parse_from(argv.iter().copied())?;
        resolve_action(args.commands)
    }

    #[test]
    fn test_select_resolves_weekday_and_row() -> Result<()> {
        let action = action_for(&["framesheet", "select", "tue", "2"])?;

        assert_eq!(action, SheetAction::Select { day: 1, row: 1 });
        Ok(())
    }

    #[test]
    fn test_select_rejects_row_zero() -> Result<()> {
        let args = Args::try_parse_from(["framesheet", "select", "tue", "0"])?;

        assert!(resolve_action(args.commands).is_err());
        Ok(())
    }

    #[test]
    fn test_select_rejects_unknown_weekday() -> Result<()> {
        let args = Args::try_parse_from(["framesheet", "select", "someday", "1"])?;

        assert!(resolve_action(args.commands).is_err());
        Ok(())
    }

    #[test]
    fn test_empty_message_clears_it() -> Result<()> {
        let action = action_for(&["framesheet", "edit", "message", ""])?;

        assert_eq!(action, SheetAction::EditMessage(None));
        Ok(())
    }

    #[test]
    fn test_edit_start_parses_a_datetime() -> Result<()> {
        let action = action_for(&["framesheet", "edit", "start", "2018-06-11 07:16"])?;

        assert!(matches!(action, SheetAction::EditStart(_)));
        Ok(())
    }

    #[test]
    fn test_global_flags_parse() -> Result<()> {
        let args = Args::try_parse_from(["framesheet", "--plain", "--log", "show"])?;

        assert!(args.plain);
        assert!(args.log);
        assert!(matches!(args.commands, Commands::Show));
        Ok(())
    }
}
