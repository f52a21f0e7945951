//! Line-oriented command interpreter over a [`DesktopContext`].

use std::io::{BufRead, Write};

use anyhow::{anyhow, bail, Context, Result};
use desktop_app_contract::{ApplicationId, WindowId};
use desktop_runtime::{DesktopContext, OpenWindowRequest, WindowRecord};

pub const HELP: &str = "\
commands:
  apps                         list registered applications
  open <app> [title...]        open a window (reuses single-instance windows)
  focus|minimize|toggle|maximize|restore|hide|close-window <window>
  move <window> <x> <y>        record a position written by the presentation layer
  resize <window> <w> <h>      record a size written by the presentation layer
  close <app>                  close the first window of an application
  close-all <app>              close every window of an application
  windows | taskbar | top      window queries
  theme [set <id>]             show or select the theme
  wallpaper [set <id>]         show or select the wallpaper
  set <key> <json>             write a session setting
  get <key>                    read a session setting
  uninstall <app>              remove an application and its windows
  help";

fn app_arg(arg: Option<&str>) -> Result<ApplicationId> {
    let raw = arg.ok_or_else(|| anyhow!("missing application id"))?;
    Ok(raw.parse()?)
}

fn window_arg(arg: Option<&str>) -> Result<WindowId> {
    let raw = arg.ok_or_else(|| anyhow!("missing window id"))?;
    Ok(raw.parse()?)
}

fn int_arg(arg: Option<&str>, name: &str) -> Result<i32> {
    let raw = arg.ok_or_else(|| anyhow!("missing {name}"))?;
    raw.parse()
        .with_context(|| format!("{name} must be an integer, got `{raw}`"))
}

fn describe(window: &WindowRecord) -> String {
    let mut flags = Vec::new();
    if window.minimized {
        flags.push("minimized");
    }
    if window.maximized {
        flags.push("maximized");
    }
    if window.hidden {
        flags.push("hidden");
    }
    let rect = window.rect;
    format!(
        "{} \"{}\" order={} at {},{} size {}x{}{}",
        window.id,
        window.title,
        window.stack_order,
        rect.x,
        rect.y,
        rect.w,
        rect.h,
        if flags.is_empty() {
            String::new()
        } else {
            format!(" [{}]", flags.join(","))
        }
    )
}

/// Executes one command line, writing its output to `out`.
///
/// # Errors
///
/// Returns an error for unknown commands, malformed arguments, or a rejected operation.
pub fn run_line(context: &mut DesktopContext, line: &str, out: &mut impl Write) -> Result<()> {
    let mut words = line.split_whitespace();
    let Some(command) = words.next() else {
        return Ok(());
    };

    match command {
        "help" => writeln!(out, "{HELP}")?,
        "apps" => {
            for app in context.registry().list() {
                let single = if app.single_instance { " (single)" } else { "" };
                writeln!(out, "{} \"{}\"{single}", app.app_id, app.display_name)?;
            }
        }
        "open" => {
            let app_id = app_arg(words.next())?;
            let title = words.collect::<Vec<_>>().join(" ");
            let mut request = OpenWindowRequest::new(app_id);
            if !title.is_empty() {
                request = request.with_title(title);
            }
            let window_id = context.open_with(request)?;
            writeln!(out, "opened {window_id}")?;
        }
        "focus" | "minimize" | "toggle" | "maximize" | "restore" | "hide" | "close-window" => {
            let window_id = window_arg(words.next())?;
            match command {
                "focus" => context.focus(&window_id)?,
                "minimize" => context.minimize(&window_id)?,
                "toggle" => context.toggle_minimize(&window_id)?,
                "maximize" => context.maximize(&window_id)?,
                "restore" => context.restore(&window_id)?,
                "hide" => context.hide(&window_id)?,
                _ => context.close_window(&window_id)?,
            }
            writeln!(out, "ok")?;
        }
        "move" => {
            let window_id = window_arg(words.next())?;
            let x = int_arg(words.next(), "x")?;
            let y = int_arg(words.next(), "y")?;
            context.move_window(&window_id, x, y)?;
            writeln!(out, "ok")?;
        }
        "resize" => {
            let window_id = window_arg(words.next())?;
            let w = int_arg(words.next(), "width")?;
            let h = int_arg(words.next(), "height")?;
            context.resize_window(&window_id, w, h)?;
            writeln!(out, "ok")?;
        }
        "close" => {
            let app_id = app_arg(words.next())?;
            let closed = context.close(&app_id);
            writeln!(out, "{}", if closed { "closed" } else { "not open" })?;
        }
        "close-all" => {
            let app_id = app_arg(words.next())?;
            writeln!(out, "closed {}", context.close_all(&app_id))?;
        }
        "windows" => {
            for window in context.list_windows() {
                writeln!(out, "{}", describe(window))?;
            }
        }
        "taskbar" => {
            for entry in context.taskbar() {
                let marker = if entry.active { "*" } else { " " };
                writeln!(out, "{marker} {} \"{}\"", entry.window_id, entry.title)?;
            }
        }
        "top" => match context.topmost() {
            Some(window) => writeln!(out, "{}", describe(window))?,
            None => writeln!(out, "none")?,
        },
        "theme" | "wallpaper" => match (words.next(), words.next()) {
            (None, _) => {
                let current = if command == "theme" {
                    context.theme()
                } else {
                    context.wallpaper()
                };
                writeln!(out, "{current}")?;
            }
            (Some("set"), Some(id)) => {
                if command == "theme" {
                    context.set_theme(id)?;
                } else {
                    context.set_wallpaper(id)?;
                }
                writeln!(out, "ok")?;
            }
            _ => bail!("usage: {command} [set <id>]"),
        },
        "set" => {
            let key = words.next().ok_or_else(|| anyhow!("missing setting key"))?;
            let raw = words.collect::<Vec<_>>().join(" ");
            let value = serde_json::from_str(&raw)
                .with_context(|| format!("setting value must be JSON, got `{raw}`"))?;
            context.set_setting(key, value)?;
            writeln!(out, "ok")?;
        }
        "get" => {
            let key = words.next().ok_or_else(|| anyhow!("missing setting key"))?;
            match context.setting(key) {
                Some(value) => writeln!(out, "{value}")?,
                None => writeln!(out, "unset")?,
            }
        }
        "uninstall" => {
            let app_id = app_arg(words.next())?;
            context.uninstall(&app_id)?;
            writeln!(out, "ok")?;
        }
        other => bail!("unknown command `{other}`; try `help`"),
    }
    Ok(())
}

/// Runs every line of `input`, skipping blanks and `#` comments.
///
/// Command failures are reported inline as `error: ...` and do not stop the script. Returns the
/// number of failed lines.
///
/// # Errors
///
/// Returns an error only when reading `input` or writing `out` fails.
pub fn run_script(
    context: &mut DesktopContext,
    input: impl BufRead,
    out: &mut impl Write,
) -> Result<usize> {
    let mut failures = 0;
    for (index, line) in input.lines().enumerate() {
        let line = line.context("failed to read command input")?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Err(err) = run_line(context, line, out) {
            failures += 1;
            log::debug!("line {} failed: {err:#}", index + 1);
            writeln!(out, "error: {err:#}")?;
        }
    }
    Ok(failures)
}
