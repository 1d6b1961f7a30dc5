use crate::dispatch::{ChatResult, ProviderRegistry};
use crate::recommend::Recommendation;
use crate::utils::text::wrap_text;
use console::style;

/// Display an assistant reply in a formatted box with a provider footer
pub fn display_reply(result: &ChatResult) {
    let term = console::Term::stdout();
    let terminal_width = term.size().1 as usize;
    let max_width = std::cmp::min(terminal_width.saturating_sub(4), 120).max(60);

    let wrapped_lines = wrap_text(&result.text, max_width.saturating_sub(4));

    let content_max_len = wrapped_lines
        .iter()
        .map(|line| line.chars().count())
        .max()
        .unwrap_or(0);
    let box_width = std::cmp::min(max_width, content_max_len + 4).max(20);

    let top_border = "┌".to_string() + &"─".repeat(box_width - 2) + "┐";
    let bottom_border = "└".to_string() + &"─".repeat(box_width - 2) + "┘";

    println!("\n{}", style("🤖 SAHAYAK").bold().blue());
    println!("{}", style(&top_border).dim().blue());

    for line in wrapped_lines {
        let padding = box_width.saturating_sub(line.chars().count() + 3);
        println!("│ {}{}│", style(&line).white(), " ".repeat(padding));
    }

    println!("{}", style(&bottom_border).dim().blue());

    let footer = match &result.model_used {
        Some(model) => format!("via {} ({})", result.provider_used, model),
        None => format!("via {}", result.provider_used),
    };
    println!("{}", style(footer).dim());
}

/// Provider availability overview
pub fn display_status(registry: &ProviderRegistry) {
    println!("{}", style("Provider status").bold());
    for entry in registry.entries() {
        let mark = if entry.available {
            style("✓").green()
        } else {
            style("✗").red()
        };
        println!("  {} {}", mark, entry.adapter.name());
    }

    match registry.primary_provider() {
        Some(primary) => println!("Primary provider: {}", style(primary).bold().green()),
        None => println!("{}", style("No provider configured").bold().red()),
    }
    println!("Available models: {}", registry.total_models());
}

/// Per-provider model listing
pub fn display_models(registry: &ProviderRegistry) {
    for entry in registry.entries() {
        let name = entry.adapter.name();
        let models = entry.adapter.models();

        if !entry.available {
            println!("{} {}", style(name).bold(), style("(not configured)").dim());
            continue;
        }
        if models.is_empty() {
            println!(
                "{} {}",
                style(name).bold(),
                style("(provider-managed)").dim()
            );
            continue;
        }

        println!("{}", style(name).bold());
        for model in models {
            println!("  {}", model);
        }
    }
}

pub fn display_recommendations(recommendations: &[Recommendation]) {
    for rec in recommendations {
        println!(
            "{} {} {}",
            rec.icon,
            style(rec.title).bold(),
            style(format!("[{}]", rec.category)).dim()
        );
        println!("   {}", rec.description);
    }
}
