//! Example: a line-oriented terminal host for the choice engine
//!
//! Demonstrates driving a `Picker` purely through the collaborator traits:
//! the renderer redraws the dropdown after every recomputation and the
//! form-sync collaborator prints what a native form element would receive.
//!
//! Run with:
//! ```bash
//! cargo run --example terminal_host
//! ```
//!
//! Type text to filter. Commands: `:open`, `:close`, `:down`, `:up`,
//! `:enter`, `:back`, `:clear`, `:add <text>`, `:q`.

use pickr::{
    ChoiceSpec, EmptyState, FormSync, GroupSpec, Picker, PickerConfig, RenderFrame, Renderer,
};
use std::io::{self, BufRead, Write};

/// Prints the dropdown state after every recomputation
struct TerminalRenderer;

impl Renderer for TerminalRenderer {
    fn render(&mut self, frame: &RenderFrame) {
        println!("{}", "─".repeat(48));
        if frame.loading {
            println!("  (loading…)");
            return;
        }
        if !frame.selected.is_empty() {
            let labels: Vec<&str> = frame.selected.iter().map(|s| s.label.as_str()).collect();
            println!("  selected: {}", labels.join(", "));
        }
        match &frame.empty_state {
            Some(EmptyState::LimitReached { limit }) => {
                println!("  Only {limit} values can be added");
            }
            Some(EmptyState::NoResults { query }) => {
                println!("  No results found for {query:?}");
            }
            Some(EmptyState::NoChoices) => println!("  No choices to choose from"),
            None => {
                for candidate in &frame.candidates {
                    let marker = if candidate.highlighted { '▸' } else { ' ' };
                    let state = if candidate.disabled { " (disabled)" } else { "" };
                    println!("  {marker} {}{state}", candidate.label);
                }
            }
        }
    }
}

/// Prints what would be written into the native form element
struct TerminalFormSync;

impl FormSync for TerminalFormSync {
    fn values_changed(&mut self, values: &[String]) {
        println!("  form value: {values:?}");
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .init();

    let config = PickerConfig::default().with_search_floor(1);
    let mut picker = Picker::new(config)?;

    let fruit = picker.add_group(GroupSpec::new("Fruit"))?;
    picker.add_choices([
        ChoiceSpec::new("Apple", "apple").with_group(fruit),
        ChoiceSpec::new("Banana", "banana").with_group(fruit),
        ChoiceSpec::new("Cherry", "cherry").with_group(fruit),
        ChoiceSpec::new("Carrot", "carrot"),
        ChoiceSpec::new("Celery", "celery").disabled(true),
    ])?;

    picker.attach_renderer(TerminalRenderer);
    picker.attach_form_sync(TerminalFormSync);
    picker.open()?;

    let stdin = io::stdin();
    loop {
        print!("> ");
        io::stdout().flush()?;
        let Some(line) = stdin.lock().lines().next() else {
            break;
        };
        let line = line?;
        let input = line.trim();

        let result = match input {
            ":q" => break,
            ":open" => picker.open().map(|_| ()),
            ":close" => {
                picker.close();
                Ok(())
            }
            ":down" => picker.next().map(|_| ()),
            ":up" => picker.previous().map(|_| ()),
            ":enter" => picker.select_highlighted().map(|_| ()),
            ":back" => picker.remove_last().map(|_| ()),
            ":clear" => picker.clear_selection().map(|_| ()),
            _ => {
                if let Some(text) = input.strip_prefix(":add ") {
                    picker.create_and_select(text, text).map(|_| ())
                } else {
                    picker.set_query(input)
                }
            }
        };

        if let Err(rejection) = result {
            println!("  rejected: {rejection}");
        }
    }

    Ok(())
}
