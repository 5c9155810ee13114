use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use chrono::NaiveDate;

use studyplan::deck::{self, RuleCard};
use studyplan::profile::Profile;
use studyplan::{calendar, store, task, Planner};

const USAGE: &str = "\
Usage: studyplan <command> [args...] [options]
Commands:
  plan <start> <end>     Regenerate the plan from start to end (yyyy-MM-dd)
  cards                  Add rule cards for new error-log entries
  drill                  Review due rule cards in the terminal
  due                    List rule cards due today
  stats                  Show memory stats for the deck and task store
  rollover               Move unfinished past tasks onto today
Options:
  --tasks FILE           Task store (default tasks.json)
  --errors FILE          Error log (default errors.csv)
  --deck FILE            Rule deck (default deck.csv)
  --profile FILE         Profile (default profile.json)
  --today DATE           Override today's date";

struct Options {
    positional: Vec<String>,
    tasks: PathBuf,
    errors: PathBuf,
    deck: PathBuf,
    profile: PathBuf,
    today: NaiveDate,
}

fn main() {
    env_logger::init();
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        eprintln!("{USAGE}");
        std::process::exit(1);
    }

    let opts = parse_options(&args[2..]);
    match args[1].as_str() {
        "plan" => plan(&opts),
        "cards" => cards(&opts),
        "drill" => drill(&opts),
        "due" => due(&opts),
        "stats" => stats(&opts),
        "rollover" => rollover(&opts),
        _ => {
            eprintln!("Unknown command: {}", args[1]);
            eprintln!("Commands: plan, cards, drill, due, stats, rollover");
            std::process::exit(1);
        }
    }
}

fn or_exit<T>(result: studyplan::Result<T>) -> T {
    result.unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        std::process::exit(1);
    })
}

fn parse_options(args: &[String]) -> Options {
    let mut opts = Options {
        positional: Vec::new(),
        tasks: PathBuf::from("tasks.json"),
        errors: PathBuf::from("errors.csv"),
        deck: PathBuf::from("deck.csv"),
        profile: PathBuf::from("profile.json"),
        today: chrono::Local::now().date_naive(),
    };
    let mut i = 0;
    while i < args.len() {
        let flag = args[i].as_str();
        let takes_value = matches!(flag, "--tasks" | "--errors" | "--deck" | "--profile" | "--today");
        if !takes_value {
            opts.positional.push(args[i].clone());
            i += 1;
            continue;
        }
        let Some(value) = args.get(i + 1) else {
            eprintln!("Missing value for {flag}");
            std::process::exit(1);
        };
        match flag {
            "--tasks" => opts.tasks = PathBuf::from(value),
            "--errors" => opts.errors = PathBuf::from(value),
            "--deck" => opts.deck = PathBuf::from(value),
            "--profile" => opts.profile = PathBuf::from(value),
            _ => opts.today = or_exit(calendar::parse_iso_date(value)),
        }
        i += 2;
    }
    opts
}

fn plan(opts: &Options) {
    let [start, end] = opts.positional.as_slice() else {
        eprintln!("Usage: studyplan plan <start> <end> [options]");
        std::process::exit(1);
    };
    let start = or_exit(calendar::parse_iso_date(start));
    let end = or_exit(calendar::parse_iso_date(end));

    let profile = or_exit(Profile::load_or_default(&opts.profile));
    let existing = or_exit(store::load_tasks(&opts.tasks));
    let errors = or_exit(store::load_errors(&opts.errors));

    let tasks = Planner::new(profile.plan.clone()).generate(start, end, &existing, &errors);
    or_exit(store::save_tasks(&opts.tasks, &tasks));

    let in_range = tasks.iter().filter(|t| t.date >= start && t.date <= end).count();
    println!(
        "Planned {} tasks from {} to {} ({} total in {}).",
        in_range,
        start,
        end,
        tasks.len(),
        opts.tasks.display()
    );
    println!("{} days until the exam.", profile.days_until_exam(opts.today));
}

fn cards(opts: &Options) {
    let errors = or_exit(store::load_errors(&opts.errors));
    let mut deck = or_exit(store::load_deck(&opts.deck));

    let created = deck::cards_from_errors(&deck, &errors, opts.today);
    if created.is_empty() {
        println!("No new rules to add.");
        return;
    }
    println!("Added {} rule cards:", created.len());
    for card in &created {
        println!("  [{}] {}: {}", card.priority, card.subject, card.rule_text);
    }
    deck.extend(created);
    or_exit(store::save_deck(&opts.deck, &deck));
}

fn due(opts: &Options) {
    let deck = or_exit(store::load_deck(&opts.deck));
    let due = deck::due_cards(&deck, opts.today);

    println!("Subjects:");
    for s in deck::subject_summaries(&deck, opts.today) {
        println!("  {} ({} due / {} total)", s.subject, s.due, s.total);
    }
    println!();

    if due.is_empty() {
        println!("No rules due for review.");
        return;
    }
    println!("{} rules due:", due.len());
    for card in due {
        let overdue = if card.is_overdue(opts.today) { " (overdue)" } else { "" };
        println!("  {} [{}] {}{}", card.next_review_date, card.priority, card.subject, overdue);
    }
}

fn drill(opts: &Options) {
    let mut deck = or_exit(store::load_deck(&opts.deck));
    let due_ids: Vec<String> = deck::due_cards(&deck, opts.today)
        .into_iter()
        .map(|c| c.id.clone())
        .collect();

    if due_ids.is_empty() {
        println!("No rules due for review.");
        return;
    }
    println!("{} rules due for review.\n", due_ids.len());

    let stdin = io::stdin();
    let mut stdin = stdin.lock();
    let mut reviewed = 0usize;
    let mut recalled = 0usize;

    for (i, id) in due_ids.iter().enumerate() {
        let Some(card) = deck.iter_mut().find(|c| &c.id == id) else {
            continue;
        };
        println!("[{}/{}] {} ({} priority)", i + 1, due_ids.len(), card.subject, card.priority);
        println!("Write the rule from memory, then press Enter to reveal...");
        io::stdout().flush().unwrap();
        let mut buf = String::new();
        if stdin.read_line(&mut buf).unwrap_or(0) == 0 {
            break;
        }
        println!("{}", card.rule_text);
        println!();

        let Some(score) = prompt_score(&mut stdin) else {
            break;
        };
        if score > deck::RECALL_THRESHOLD {
            recalled += 1;
        }
        reviewed += 1;
        *card = deck::update_card(card, score, opts.today);
        println!("Next review: {}\n", card.next_review_date);
    }

    or_exit(store::save_deck(&opts.deck, &deck));
    println!("Session complete! Reviewed {reviewed}, recalled {recalled}.");
}

fn prompt_score(stdin: &mut impl BufRead) -> Option<u8> {
    let mut buf = String::new();
    loop {
        print!("Score your recall (0-100): ");
        io::stdout().flush().unwrap();
        buf.clear();
        if stdin.read_line(&mut buf).unwrap_or(0) == 0 {
            return None;
        }
        match buf.trim().parse::<u8>() {
            Ok(n) if n <= 100 => return Some(n),
            _ => println!("Please enter a number from 0 to 100."),
        }
    }
}

fn stats(opts: &Options) {
    let profile = or_exit(Profile::load_or_default(&opts.profile));
    let deck: Vec<RuleCard> = or_exit(store::load_deck(&opts.deck));
    let tasks = or_exit(store::load_tasks(&opts.tasks));

    let planned_minutes: u32 = tasks.iter().map(|t| t.estimated_minutes).sum();
    let s = deck::compute_stats(&deck, &tasks, planned_minutes, opts.today);

    println!("Rules in deck:        {}", s.total_rules_in_deck);
    println!("Overdue rules:        {}", s.overdue_rules);
    println!("Review coverage:      {}%", s.review_coverage_percentage);
    println!("Active recall time:   {}%", s.active_recall_time_percent);
    println!("Days until exam:      {}", profile.days_until_exam(opts.today));
}

fn rollover(opts: &Options) {
    let tasks = or_exit(store::load_tasks(&opts.tasks));
    let rolled = task::roll_over_incomplete(&tasks, opts.today);
    let moved = tasks.iter().zip(&rolled).filter(|(a, b)| a.date != b.date).count();
    or_exit(store::save_tasks(&opts.tasks, &rolled));
    println!("Moved {moved} unfinished tasks to {}.", opts.today);
}
