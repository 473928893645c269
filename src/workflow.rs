use crate::cli::{InitArgs, ListArgs, SubmitArgs};
use anyhow::{anyhow, Context, Result};
use review_enrich::config::{
    build_enricher, build_store, default_config, load_config, resolve_config_path, write_config,
};
use review_enrich::notify::ConsoleNotifier;
use review_enrich::orchestrator::{SubmissionOrchestrator, SubmitOutcome};
use review_enrich::review::{ReviewForm, StoredReview, MAX_RATING};
use std::fs;
use std::io::Read;
use std::process::ExitCode;

pub fn run_init(args: InitArgs) -> Result<ExitCode> {
    let path = resolve_config_path(args.config.as_deref())?;
    if path.is_file() && !args.force {
        return Err(anyhow!(
            "config already exists at {} (use --force to overwrite)",
            path.display()
        ));
    }
    write_config(&path, &default_config())?;
    println!("wrote {}", path.display());
    Ok(ExitCode::SUCCESS)
}

pub fn run_submit(args: SubmitArgs) -> Result<ExitCode> {
    let config_path = resolve_config_path(args.config.as_deref())?;
    let config = load_config(&config_path)?;

    let text = read_review_text(&args)?;
    let mut form = ReviewForm::new(config.max_review_chars);
    if args.rating != 0 {
        form.select_rating(args.rating)?;
    }
    form.set_text(&text);
    if text.chars().count() > config.max_review_chars {
        tracing::warn!(
            max_chars = config.max_review_chars,
            "review text truncated to the character limit"
        );
    }

    let orchestrator = SubmissionOrchestrator::new(
        build_enricher(&config, args.enrich_command.as_deref())?,
        build_store(&config)?,
        Box::new(ConsoleNotifier),
    );

    match form.submit(&orchestrator) {
        SubmitOutcome::Submitted { reply } => {
            if args.json {
                let payload = serde_json::json!({ "reply": reply });
                let text =
                    serde_json::to_string_pretty(&payload).context("serialize reply JSON")?;
                println!("{text}");
            } else {
                println!("{reply}");
            }
            Ok(ExitCode::SUCCESS)
        }
        // The notifier has already reported the failure.
        SubmitOutcome::Failed(_) | SubmitOutcome::Ignored => Ok(ExitCode::FAILURE),
    }
}

fn read_review_text(args: &SubmitArgs) -> Result<String> {
    if let Some(text) = &args.text {
        return Ok(text.clone());
    }
    match args.text_file.as_deref() {
        Some(path) if path.as_os_str() == "-" => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("read review text from stdin")?;
            Ok(text)
        }
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("read review text {}", path.display())),
        None => Ok(String::new()),
    }
}

pub fn run_list(args: ListArgs) -> Result<ExitCode> {
    let config_path = resolve_config_path(args.config.as_deref())?;
    let config = load_config(&config_path)?;
    let store = build_store(&config)?;
    let reviews = store.recent(args.limit).context("list reviews")?;

    if args.json {
        let text = serde_json::to_string_pretty(&reviews).context("serialize reviews")?;
        println!("{text}");
    } else if reviews.is_empty() {
        println!("no reviews stored");
    } else {
        for review in &reviews {
            println!("{}", format_review(review));
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn format_review(stored: &StoredReview) -> String {
    let review = &stored.review;
    let filled = usize::from(review.rating.min(MAX_RATING));
    let stars = format!(
        "{}{}",
        "★".repeat(filled),
        "☆".repeat(usize::from(MAX_RATING) - filled)
    );
    let mut out = match &stored.created_at {
        Some(created_at) => format!("[{created_at}] {stars} {}\n", review.text),
        None => format!("{stars} {}\n", review.text),
    };
    for (label, value) in [
        ("reply", &review.reply),
        ("summary", &review.summary),
        ("actions", &review.recommended_actions),
    ] {
        let value = value.as_deref().unwrap_or("-");
        let mut lines = value.lines();
        out.push_str(&format!("  {label:<8} {}\n", lines.next().unwrap_or("")));
        for line in lines {
            out.push_str(&format!("  {:<8} {line}\n", ""));
        }
    }
    out
}
