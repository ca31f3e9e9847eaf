mod keys;
mod store;

use std::{
    fmt,
    io::{stdout, Write},
    path::PathBuf,
};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    cursor::MoveTo,
    event::{read, Event},
    style::{Color, Stylize},
    terminal::{disable_raw_mode, enable_raw_mode, Clear, ClearType},
    Command, ExecutableCommand,
};
use env_logger::Env;
use log::{debug, info};
use pastel_2048::{
    session::{Frame, GameSession},
    store::BestScoreStore,
};
use rand::{rngs::StdRng, SeedableRng};

use keys::{map_key, Input};
use store::FileStore;

#[derive(Debug, Parser)]
#[command(author, version, about = "Slide and merge tiles until one reaches 2048")]
struct Cli {
    /// Seed for tile placement; random when omitted
    #[arg(long, value_name = "N")]
    seed: Option<u64>,

    /// File the best score is kept in
    #[arg(
        long,
        value_name = "FILE",
        env = "PASTEL_2048_BEST_FILE",
        default_value = ".pastel-2048.json"
    )]
    best_file: PathBuf,
}

struct FrameCommand<'a>(&'a Frame);

impl<'a> Command for FrameCommand<'a> {
    fn write_ansi(&self, f: &mut impl fmt::Write) -> fmt::Result {
        for row in self.0.grid.iter() {
            print_row(f, row)?;
            write!(f, "|\r\n")?;
        }

        write!(
            f,
            "\r\nscore {: >7}   best {: >7}\r\n",
            self.0.score, self.0.best_score
        )?;

        let status = if self.0.game_over {
            "no moves left: u to undo, n for a new game"
        } else if self.0.show_win {
            "2048! c to keep playing, n for a new game"
        } else {
            "arrows/hjkl move, u undo, n new game, q quit"
        };
        write!(f, "{status}\r\n")
    }
}

fn styled(value: u32) -> impl fmt::Display {
    format!("{: ^6}", value).with(match value {
        2 => Color::White,
        4 => Color::Rgb {
            r: 255,
            g: 215,
            b: 0,
        }, // orange
        8 => Color::DarkYellow,
        16 => Color::Magenta,
        32 => Color::Green,
        64 => Color::Blue,
        128 | 256 | 512 => Color::Cyan,
        1024 => Color::Red,
        _ => Color::DarkRed,
    })
}

fn print_row(f: &mut impl fmt::Write, row: &[u32]) -> fmt::Result {
    for &value in row.iter() {
        match value {
            0 => write!(f, "|{: ^6}", " ")?,
            v => write!(f, "|{}", styled(v))?,
        }
    }
    Ok(())
}

/// Raw mode for as long as it lives.
struct RawMode;

impl RawMode {
    fn enable() -> Result<Self> {
        enable_raw_mode().context("could not enter raw mode")?;
        Ok(RawMode)
    }
}

impl Drop for RawMode {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
    }
}

fn play_interactive<S: BestScoreStore>(game: &mut GameSession<StdRng, S>) -> Result<()> {
    let _raw = RawMode::enable()?;
    let mut stdout = stdout();

    'gameloop: loop {
        stdout
            .execute(Clear(ClearType::All))?
            .execute(MoveTo(0, 0))?
            .execute(FrameCommand(&game.frame()))?;

        let input = match read()? {
            Event::Key(k) => map_key(k),
            ev => {
                debug!("ignored {:?}", ev);
                continue 'gameloop;
            }
        };

        match input {
            Some(Input::Quit) => break 'gameloop,
            Some(Input::Command(c)) => {
                let redraw = game.apply(c);
                debug!("{c:?} redraw={redraw}");
            }
            None => {}
        }
    }

    stdout.flush()?;
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();

    let rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    info!("best score file {}", cli.best_file.display());

    let mut game = GameSession::new(rng, FileStore::new(cli.best_file));
    play_interactive(&mut game).context("terminal game failed")?;

    println!("score {}, best {}", game.score(), game.best_score());
    Ok(())
}
