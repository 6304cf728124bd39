use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result, anyhow};
use clap::{Args, Parser, Subcommand};
use tracing::error;

use bdb_tracking::data_mergers;
use bdb_tracking::dataset::Dataset;
use bdb_tracking::file_movers;
use bdb_tracking::input_checkers;
use bdb_tracking::lookup::{self, PlayFilter};
use bdb_tracking::plot_helpers::{self, Matchup, RenderOptions};
use bdb_tracking::prompt::Prompter;
use bdb_tracking::settings::Settings;
use bdb_tracking::teams;

#[derive(Parser)]
#[command(author, version, about = "Big Data Bowl tracking lookups and play renders", long_about = None)]
struct Cli {
    /// Directory holding games.csv, plays.csv and the weekly tracking files
    #[arg(long, global = true, env = "BDB_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Root for logos, temporary frames and rendered output
    #[arg(long, global = true, env = "BDB_IMG_DIR")]
    img_dir: Option<PathBuf>,

    /// Fail on an invalid identifier instead of asking again
    #[arg(long, global = true)]
    no_prompt: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Clone)]
struct GameArgs {
    #[arg(long)]
    game: Option<u64>,
    #[arg(long)]
    home: Option<String>,
    #[arg(long)]
    away: Option<String>,
}

#[derive(Args, Clone, Copy)]
struct DrawArgs {
    #[arg(long)]
    no_los: bool,
    #[arg(long)]
    no_first_down: bool,
    #[arg(long)]
    no_arrows: bool,
}

impl DrawArgs {
    fn options(self) -> RenderOptions {
        RenderOptions {
            los: !self.no_los,
            first_down: !self.no_first_down,
            arrows: !self.no_arrows,
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// List team codes and nicknames
    Teams,
    /// List games, optionally for one week
    Games {
        #[arg(long)]
        week: Option<i64>,
    },
    /// List the plays of a game
    Plays(GameArgs),
    /// Derived values for one play
    Lookup {
        #[arg(long)]
        game: u64,
        #[arg(long)]
        play: u64,
        #[arg(long)]
        json: bool,
    },
    /// Resolve a play ID from column filters (`--filter down=3,4`)
    FindPlay {
        #[command(flatten)]
        game: GameArgs,
        #[arg(long = "filter")]
        filters: Vec<String>,
    },
    /// Draw an empty field for a game or matchup
    Field {
        #[command(flatten)]
        game: GameArgs,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Draw one frame of a play
    Frame {
        #[arg(long)]
        game: u64,
        #[arg(long)]
        play: u64,
        #[arg(long)]
        frame: u32,
        #[command(flatten)]
        draw: DrawArgs,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Animate a whole play into a GIF
    Gif {
        #[arg(long)]
        game: u64,
        #[arg(long)]
        play: u64,
        #[arg(long)]
        name: Option<String>,
        #[command(flatten)]
        draw: DrawArgs,
    },
}

fn main() -> ExitCode {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
    bdb_tracking::init_logging();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut settings = Settings::from_env();
    if let Some(dir) = cli.data_dir {
        settings.data_dir = dir;
    }
    if let Some(dir) = cli.img_dir {
        settings.img_dir = dir;
    }

    let ds = Dataset::load(&settings)?;
    let stdin = io::stdin();
    let mut prompter = if cli.no_prompt {
        Prompter::non_interactive(stdin.lock(), io::stdout())
    } else {
        Prompter::new(stdin.lock(), io::stdout())
    };

    match cli.command {
        Command::Teams => {
            for t in &ds.teams {
                println!("{:<4} {}", t.team_code, t.nickname);
            }
        }
        Command::Games { week } => {
            let week = week.map(|w| prompter.week_number(w)).transpose()?;
            for choice in input_checkers::game_choices(&ds, week) {
                println!("{choice}");
            }
        }
        Command::Plays(game) => {
            let game_id = resolve_game(&mut prompter, &ds, &game)?;
            for ctx in data_mergers::plays_and_games(&ds, Some(game_id)) {
                println!(
                    "{} -- {} [{} on offense vs {}]",
                    ctx.play.play_id, ctx.play.down_dist_summary, ctx.offensive_team, ctx.defensive_team
                );
            }
        }
        Command::Lookup { game, play, json } => {
            let key = prompter.play_id(&ds, game, play)?;
            let week = lookup::game_week(&ds, key.game_id)?;
            let tracking = ds.play_tracking(week, key.game_id, key.play_id)?;
            let snap = lookup::snapshot(&ds, key, &tracking)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&snap)?);
            } else {
                println!("{} @ {} (week {})", snap.away, snap.home, snap.week);
                println!("{}", snap.down_dist_summary);
                println!("line of scrimmage: {}", fmt_opt(snap.line_of_scrimmage));
                println!("yards to go:       {}", snap.yards_to_go);
                println!("first down line:   {}", fmt_opt(snap.first_down_line));
                println!("frames:            {}", fmt_opt(snap.n_frames));
            }
        }
        Command::FindPlay { game, filters } => {
            let game_id = resolve_game(&mut prompter, &ds, &game)?;
            let filters = filters
                .iter()
                .map(|raw| PlayFilter::parse(raw).ok_or_else(|| anyhow!("{raw:?} is not key=value[,value]")))
                .collect::<Result<Vec<_>>>()?;
            let key = prompter.resolve_play(&ds, game_id, &filters)?;
            let summary = ds
                .play(key.game_id, key.play_id)
                .map(|p| p.down_dist_summary.as_str())
                .unwrap_or_default();
            println!("{} -- {}", key.play_id, summary);
        }
        Command::Field { game, output } => {
            let matchup = resolve_matchup(&mut prompter, &ds, &game)?;
            let canvas = plot_helpers::field(&settings, &matchup)?;
            let out = output.unwrap_or_else(|| {
                settings.img_dir.join(format!(
                    "field_{}_{}.png",
                    matchup.home.team_code, matchup.away.team_code
                ))
            });
            save_png(canvas.image(), &out)?;
        }
        Command::Frame {
            game,
            play,
            frame,
            draw,
            output,
        } => {
            let key = prompter.play_id(&ds, game, play)?;
            let week = lookup::game_week(&ds, key.game_id)?;
            let tracking = ds.play_tracking(week, key.game_id, key.play_id)?;
            let frame = prompter.frame_no(&ds, key, frame, &tracking)?;
            let canvas = plot_helpers::render_frame(&ds, key, frame, Some(tracking), draw.options())?;
            let out = output.unwrap_or_else(|| {
                settings
                    .img_dir
                    .join("frames")
                    .join(file_movers::frame_file_name(key, frame))
            });
            save_png(canvas.image(), &out)?;
        }
        Command::Gif {
            game,
            play,
            name,
            draw,
        } => {
            let key = prompter.play_id(&ds, game, play)?;
            let out = plot_helpers::play_gif(&ds, key, name.as_deref(), None, draw.options())?;
            println!("{}", out.display());
        }
    }
    Ok(())
}

fn resolve_game<R: BufRead, W: Write>(
    prompter: &mut Prompter<R, W>,
    ds: &Dataset,
    args: &GameArgs,
) -> Result<u64> {
    match (args.game, args.home.as_deref(), args.away.as_deref()) {
        (Some(id), _, _) => prompter.game_id(ds, id),
        (None, Some(home), Some(away)) => prompter.game_from_teams(ds, home, away),
        _ => Err(anyhow!("pass --game, or both --home and --away")),
    }
}

/// A field can be drawn for a game, a pair of clubs, or `NFL` alone.
fn resolve_matchup<R: BufRead, W: Write>(
    prompter: &mut Prompter<R, W>,
    ds: &Dataset,
    args: &GameArgs,
) -> Result<Matchup> {
    if let Some(id) = args.game {
        let id = prompter.game_id(ds, id)?;
        return Matchup::for_game(ds, id);
    }
    let Some(home) = args.home.as_deref() else {
        return Matchup::resolve(&ds.teams, teams::NFL, None);
    };
    if home.eq_ignore_ascii_case(teams::NFL) {
        return Matchup::resolve(&ds.teams, teams::NFL, None);
    }
    let home = prompter.team_code(ds, home)?;
    let away = match args.away.as_deref() {
        Some(a) => prompter.team_code(ds, a)?,
        None => teams::AFC.to_string(),
    };
    Matchup::resolve(&ds.teams, &home, Some(&away))
}

fn save_png(img: &image::RgbaImage, out: &std::path::Path) -> Result<()> {
    if let Some(parent) = out.parent() {
        std::fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
    }
    img.save(out).with_context(|| format!("write {}", out.display()))?;
    println!("{}", out.display());
    Ok(())
}

fn fmt_opt<T: std::fmt::Display>(v: Option<T>) -> String {
    v.map_or_else(|| "n/a".to_string(), |v| v.to_string())
}
