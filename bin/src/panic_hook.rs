use std::io::stdout;

use ratatui::crossterm::{cursor::Show, execute, terminal::disable_raw_mode};

/// Sets a panic hook that puts the terminal back in a usable state before
/// printing the panic message.
pub fn set() {
    std::panic::set_hook(Box::new(|info| {
        let _ = disable_raw_mode();
        let _ = execute!(stdout(), Show);

        let msg = if let Some(s) = info.payload().downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = info.payload().downcast_ref::<String>() {
            s.clone()
        } else {
            info.to_string()
        };

        if let Some(loc) = info.location() {
            eprintln!("Panic: {msg:?} at {}:{}", loc.file(), loc.line());
        } else {
            eprintln!("Panic: {msg:?}");
        }

        eprintln!(
            "This is a bug! Please report it along with {}",
            av_utils::log::log_path().display()
        );
    }));
}
