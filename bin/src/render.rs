use std::io::stdout;

use av_common::balance::BalanceHistory;
use av_ratatui_extra::{
    extensions::BorderedWidget,
    thematize::{DefaultTheme, Thematize},
    BalanceChart,
};
use console::{style, Term};
use ratatui::{
    backend::CrosstermBackend,
    widgets::{Block, Borders},
    Terminal, TerminalOptions, Viewport,
};

const CHART_HEIGHT: u16 = 20;

/// Draws the chart below the cursor when stdout is a terminal, otherwise
/// prints one line per day so the output can be piped.
pub fn print_history(history: &BalanceHistory, title: &str) -> crate::Result<()> {
    if Term::stdout().is_term() {
        print_chart(history, title)
    } else {
        print!("{}", history_table(history));
        Ok(())
    }
}

fn print_chart(history: &BalanceHistory, title: &str) -> crate::Result<()> {
    let theme = DefaultTheme::default();
    let mut terminal = Terminal::with_options(
        CrosstermBackend::new(stdout()),
        TerminalOptions {
            viewport: Viewport::Inline(CHART_HEIGHT),
        },
    )?;

    terminal.draw(|frame| {
        let area = frame.area();
        BalanceChart::new(history).render_with_block(
            area,
            frame.buffer_mut(),
            Block::default()
                .borders(Borders::ALL)
                .border_type(theme.border_type())
                .title(format!(" {title} ")),
            true,
            &theme,
        );
    })?;
    println!();

    Ok(())
}

pub fn history_table(history: &BalanceHistory) -> String {
    if history.is_empty() {
        return "No balance history\n".to_string();
    }

    let mut out = String::new();
    for point in history.chronological() {
        let tokens = history
            .tracked_tokens
            .iter()
            .filter_map(|symbol| point.quote(symbol).map(|quote| format!("{symbol}=${quote:.2}")))
            .collect::<Vec<_>>()
            .join(" ");
        out.push_str(&format!(
            "{}  total=${:.2}  {tokens}\n",
            point.date, point.total_usd
        ));
    }
    out
}

pub fn heading(text: &str) -> String {
    style(text).bold().underlined().to_string()
}
