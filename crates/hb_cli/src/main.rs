//! Command-line runner: simulates one game and prints the play-by-play.

use std::fs;

use anyhow::{Context, Result};
use clap::Parser;

use hb_core::api::TeamData;
use hb_core::{
    demo_team_data, handler, BallGame, EventPayload, EventTag, GameRules, Player, SeededRoller,
    Stadium, StatsMonitor, SwingOutcome, Team, TeamSide,
};

#[derive(Parser, Debug)]
#[command(name = "hardball", about = "Deterministic baseball game simulator")]
struct Args {
    /// RNG seed; the same seed replays the same game.
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Scheduled innings.
    #[arg(long, default_value_t = 9)]
    innings: u16,

    /// Home roster JSON file (api::TeamData shape); demo team if omitted.
    #[arg(long)]
    home: Option<String>,

    /// Away roster JSON file (api::TeamData shape); demo team if omitted.
    #[arg(long)]
    away: Option<String>,

    /// Print every pitch and swing, not just the action.
    #[arg(long, short)]
    verbose: bool,
}

fn load_team(path: Option<&str>, fallback_name: &str) -> Result<Team> {
    let data: TeamData = match path {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("reading roster file {path}"))?;
            serde_json::from_str(&raw).with_context(|| format!("parsing roster file {path}"))?
        }
        None => demo_team_data(fallback_name),
    };
    let roster: Vec<Player> = data
        .players
        .iter()
        .map(|p| Player::new(p.name.clone(), p.attributes.clone()))
        .collect();
    Team::new(data.name, roster, 3).map_err(Into::into)
}

fn main() -> Result<()> {
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let home = load_team(args.home.as_deref(), "Home Gulls")?;
    let away = load_team(args.away.as_deref(), "Away Crabs")?;
    let mut rules = GameRules::standard();
    rules.innings = args.innings.max(1);

    let home_names: Vec<String> = home.roster.iter().map(|p| p.name.clone()).collect();
    let away_names: Vec<String> = away.roster.iter().map(|p| p.name.clone()).collect();
    let home_team_name = home.name.clone();
    let away_team_name = away.name.clone();

    let mut game = BallGame::new(
        home.clone(),
        away.clone(),
        Stadium::standard(),
        rules,
        Box::new(SeededRoller::new(args.seed)),
    )?;
    let monitor = StatsMonitor::attach(&game.bus(), &home, &away, &rules);

    let verbose = args.verbose;
    let name = move |id: hb_core::PlayerId| -> String {
        let names = match id.side {
            TeamSide::Home => &home_names,
            TeamSide::Away => &away_names,
        };
        names
            .get(id.index as usize)
            .cloned()
            .unwrap_or_else(|| format!("#{}", id.index))
    };

    game.bus().subscribe(
        EventTag::All,
        handler(move |_, event| {
            match &event.payload {
                EventPayload::HalfInning { inning, half } => {
                    let side = if *half == 1 { "Top" } else { "Bottom" };
                    println!("=== {} of inning {} ===", side, inning);
                }
                EventPayload::Batter { player, .. } => {
                    println!("Now batting: {}", name(*player));
                }
                EventPayload::Pitch {
                    location, strike, ..
                } if verbose => {
                    let call = if *strike { "strike" } else { "ball" };
                    println!("  pitch at {:.2}: {}", location, call);
                }
                EventPayload::Swing { outcome, .. } if verbose => match outcome {
                    SwingOutcome::Ball => println!("  taken: ball"),
                    SwingOutcome::StrikeLooking => println!("  taken: strike"),
                    SwingOutcome::StrikeSwinging => println!("  swing and a miss"),
                    SwingOutcome::Foul => println!("  fouled off"),
                    SwingOutcome::Fair => println!("  in play!"),
                },
                EventPayload::HitBall {
                    batter,
                    distance,
                    home_run,
                    off_the_wall,
                    ..
                } => {
                    if *home_run {
                        println!("  {} homers, {:.0} feet!", name(*batter), distance);
                    } else if *off_the_wall {
                        println!("  {} rips one off the wall", name(*batter));
                    } else {
                        println!("  {} puts it in play ({:.0} ft)", name(*batter), distance);
                    }
                }
                EventPayload::Catch {
                    fielder, caught, ..
                } => {
                    if *caught {
                        println!("  fielded by {}", name(*fielder));
                    } else {
                        println!("  {} can't get there!", name(*fielder));
                    }
                }
                EventPayload::Throw {
                    fielder,
                    target_base,
                    ..
                } if verbose => {
                    println!("  {} throws to base {}", name(*fielder), target_base);
                }
                EventPayload::Out { player, kind, outs } => {
                    println!("  {} is out ({:?}), {} out(s)", name(*player), kind, outs);
                }
                EventPayload::Run {
                    player,
                    score_home,
                    score_away,
                } => {
                    println!(
                        "  {} scores! {}-{}",
                        name(*player),
                        score_away,
                        score_home
                    );
                }
                EventPayload::GameOver {
                    score_home,
                    score_away,
                    innings_played,
                } => {
                    println!(
                        "=== Final after {} innings: {} {:.1}, {} {:.1} ===",
                        innings_played, away_team_name, score_away, home_team_name, score_home,
                    );
                }
                _ => {}
            }
        }),
    );

    let summary = game.run_to_completion()?;

    let stats = monitor.snapshot();
    let hitters: u32 = stats
        .home
        .iter()
        .chain(stats.away.iter())
        .map(|l| l.balls_in_play)
        .sum();
    println!(
        "{} ticks, {} balls in play, final {:.1}-{:.1}",
        summary.ticks, hitters, summary.score_away, summary.score_home
    );
    Ok(())
}
