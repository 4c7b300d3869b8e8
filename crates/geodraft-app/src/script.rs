//! Session scripts: input events and editor commands, one per line.

use geodraft_core::canvas::{Canvas, EditorMode};
use geodraft_core::input::{InputEvent, MouseButton, parse_key_chord};
use geodraft_core::render::RecordingRenderer;
use geodraft_core::shapes::Rgb;
use geodraft_core::storage::{FileStorage, StorageError};
use geodraft_core::tools::{ToolKind, ToolOutcome};
use geodraft_core::EditorSettings;
use kurbo::Point;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("line {line}: {reason}")]
    Parse { line: usize, reason: String },
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// One parsed script line.
#[derive(Debug, Clone, PartialEq)]
pub enum ScriptCommand {
    /// Raw input in screen pixels.
    Event(InputEvent),
    /// Tool click at a world position, bypassing the mode.
    ClickWorld(Point),
    Mode(EditorMode),
    Tool(ToolKind),
    Param { name: String, values: Vec<String> },
    Commit,
    Finish,
    Cancel,
    Undo,
    Redo,
    Delete,
    Color(Rgb),
    Save(String),
    Load(String),
}

struct LineParser<'a> {
    line: usize,
    words: std::str::SplitWhitespace<'a>,
}

impl<'a> LineParser<'a> {
    fn error(&self, reason: impl Into<String>) -> ScriptError {
        ScriptError::Parse {
            line: self.line,
            reason: reason.into(),
        }
    }

    fn word(&mut self, what: &str) -> Result<&'a str, ScriptError> {
        self.words.next().ok_or_else(|| self.error(format!("missing {what}")))
    }

    fn number(&mut self, what: &str) -> Result<f64, ScriptError> {
        let word = self.word(what)?;
        word.parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| self.error(format!("{what} is not a number: {word:?}")))
    }

    fn point(&mut self) -> Result<Point, ScriptError> {
        Ok(Point::new(self.number("x")?, self.number("y")?))
    }

    fn button(&mut self) -> Result<MouseButton, ScriptError> {
        match self.word("button")? {
            "left" => Ok(MouseButton::Left),
            "right" => Ok(MouseButton::Right),
            "middle" => Ok(MouseButton::Middle),
            other => Err(self.error(format!("unknown button {other:?}"))),
        }
    }

    fn rest(&mut self) -> Vec<String> {
        self.words.by_ref().map(str::to_string).collect()
    }

    fn finish(mut self, command: ScriptCommand) -> Result<ScriptCommand, ScriptError> {
        match self.words.next() {
            Some(extra) => Err(self.error(format!("unexpected {extra:?}"))),
            None => Ok(command),
        }
    }
}

/// Parse one line; blank lines and `#` comments yield `None`.
pub fn parse_line(text: &str, line: usize) -> Result<Option<ScriptCommand>, ScriptError> {
    let text = text.split('#').next().unwrap_or_default();
    let mut p = LineParser {
        line,
        words: text.split_whitespace(),
    };
    let Some(keyword) = p.words.next() else {
        return Ok(None);
    };

    let command = match keyword {
        "move" => ScriptCommand::Event(InputEvent::PointerMove { position: p.point()? }),
        "down" => {
            let button = p.button()?;
            ScriptCommand::Event(InputEvent::PointerDown {
                button,
                position: p.point()?,
            })
        }
        "up" => ScriptCommand::Event(InputEvent::PointerUp { button: p.button()? }),
        "scroll" => ScriptCommand::Event(InputEvent::Scroll {
            delta: p.number("delta")?,
        }),
        "key" => {
            let (key, modifiers) = parse_key_chord(p.word("key")?);
            ScriptCommand::Event(InputEvent::Key { key, modifiers })
        }
        "click-world" => ScriptCommand::ClickWorld(p.point()?),
        "mode" => ScriptCommand::Mode(match p.word("mode")? {
            "nav" | "navigate" => EditorMode::Navigate,
            "draw" => EditorMode::Draw,
            other => return Err(p.error(format!("unknown mode {other:?}"))),
        }),
        "tool" => {
            let name = p.word("tool name")?;
            let submode = p.words.next();
            match ToolKind::from_name(name, submode) {
                Some(tool) => ScriptCommand::Tool(tool),
                None => {
                    let label = submode.map_or_else(|| name.to_string(), |m| format!("{name} {m}"));
                    return Err(p.error(format!("unknown tool {label:?}")));
                }
            }
        }
        "param" => {
            let name = p.word("parameter name")?.to_string();
            let values = p.rest();
            return Ok(Some(ScriptCommand::Param { name, values }));
        }
        "commit" => ScriptCommand::Commit,
        "finish" => ScriptCommand::Finish,
        "cancel" => ScriptCommand::Cancel,
        "undo" => ScriptCommand::Undo,
        "redo" => ScriptCommand::Redo,
        "delete" => ScriptCommand::Delete,
        "color" => {
            let r = p.number("red")? as f32;
            let g = p.number("green")? as f32;
            let b = p.number("blue")? as f32;
            ScriptCommand::Color(Rgb::clamped(r, g, b))
        }
        "save" => ScriptCommand::Save(p.word("path")?.to_string()),
        "load" => ScriptCommand::Load(p.word("path")?.to_string()),
        other => return Err(p.error(format!("unknown command {other:?}"))),
    };
    p.finish(command).map(Some)
}

/// Parse a whole script, keeping each command's line number.
pub fn parse_script(text: &str) -> Result<Vec<(usize, ScriptCommand)>, ScriptError> {
    let mut commands = Vec::new();
    for (i, line) in text.lines().enumerate() {
        if let Some(command) = parse_line(line, i + 1)? {
            commands.push((i + 1, command));
        }
    }
    Ok(commands)
}

/// A headless editing session: the canvas, where drawings are stored, and
/// the renderer each frame is drawn into.
pub struct Session {
    pub canvas: Canvas,
    pub storage: FileStorage,
    pub renderer: RecordingRenderer,
    /// Angles reported by the angle tool, in degrees.
    pub measurements: Vec<f64>,
    /// Commands that failed without ending the session.
    pub warnings: Vec<String>,
    frames: usize,
}

impl Session {
    pub fn new(settings: EditorSettings) -> Self {
        let storage = FileStorage::new(settings.resolved_save_dir());
        Self {
            canvas: Canvas::with_settings(settings),
            storage,
            renderer: RecordingRenderer::new(),
            measurements: Vec::new(),
            warnings: Vec::new(),
            frames: 0,
        }
    }

    /// Frames drawn so far.
    pub fn frames(&self) -> usize {
        self.frames
    }

    /// Run a script file.
    pub fn run_file(&mut self, path: &Path) -> Result<(), ScriptError> {
        let text = std::fs::read_to_string(path)?;
        self.run(&text)
    }

    /// Run script text. Parsing completes before anything executes.
    pub fn run(&mut self, text: &str) -> Result<(), ScriptError> {
        for (line, command) in parse_script(text)? {
            self.execute(line, command)?;
            self.draw_frame();
        }
        Ok(())
    }

    fn draw_frame(&mut self) {
        self.renderer.clear();
        self.canvas.draw(&mut self.renderer);
        self.frames += 1;
    }

    /// Execute one command to completion.
    pub fn execute(&mut self, line: usize, command: ScriptCommand) -> Result<(), ScriptError> {
        log::debug!("line {}: {:?}", line, command);
        match command {
            ScriptCommand::Event(event) => {
                let outcome = self.canvas.handle_event(&event);
                self.record(outcome);
            }
            ScriptCommand::ClickWorld(position) => {
                let outcome = self.canvas.click_world(position);
                self.record(outcome);
            }
            ScriptCommand::Mode(mode) => self.canvas.set_mode(mode),
            ScriptCommand::Tool(tool) => self.canvas.set_tool(tool),
            ScriptCommand::Param { name, values } => {
                let values: Vec<&str> = values.iter().map(String::as_str).collect();
                self.canvas
                    .tools
                    .params
                    .set(&name, &values)
                    .map_err(|e| ScriptError::Parse {
                        line,
                        reason: e.to_string(),
                    })?;
            }
            ScriptCommand::Commit => {
                let outcome = self.canvas.commit();
                self.record(outcome);
            }
            ScriptCommand::Finish => {
                let outcome = self.canvas.finish();
                self.record(outcome);
            }
            ScriptCommand::Cancel => self.canvas.cancel(),
            ScriptCommand::Undo => {
                self.canvas.undo();
            }
            ScriptCommand::Redo => {
                self.canvas.redo();
            }
            ScriptCommand::Delete => {
                self.canvas.delete_selected();
            }
            ScriptCommand::Color(color) => {
                self.canvas.set_paint_color(color);
                self.canvas.set_selected_color(color);
            }
            ScriptCommand::Save(path) => {
                self.canvas.save(&self.storage, &path)?;
            }
            ScriptCommand::Load(path) => {
                // A failed load leaves the current drawing in place.
                if let Err(e) = self.canvas.load(&self.storage, &path) {
                    self.warnings.push(format!("line {line}: load {path}: {e}"));
                }
            }
        }
        Ok(())
    }

    fn record(&mut self, outcome: ToolOutcome) {
        if let ToolOutcome::Measured(angle) = outcome {
            self.measurements.push(angle);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geodraft_core::input::Modifiers;
    use geodraft_core::shapes::ShapeKind;
    use geodraft_core::tools::{CircleMode, LineMode};
    use tempfile::TempDir;

    fn session(dir: &TempDir) -> Session {
        Session::new(EditorSettings {
            save_dir: Some(dir.path().to_path_buf()),
            ..Default::default()
        })
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(parse_line("  # comment", 1).unwrap(), None);
        assert_eq!(
            parse_line("down left 10 20", 1).unwrap(),
            Some(ScriptCommand::Event(InputEvent::PointerDown {
                button: MouseButton::Left,
                position: Point::new(10.0, 20.0),
            }))
        );
        assert_eq!(
            parse_line("key ctrl+z", 1).unwrap(),
            Some(ScriptCommand::Event(InputEvent::Key {
                key: "z".into(),
                modifiers: Modifiers {
                    ctrl: true,
                    ..Default::default()
                },
            }))
        );
        assert_eq!(
            parse_line("tool circle three-points", 1).unwrap(),
            Some(ScriptCommand::Tool(ToolKind::Circle(CircleMode::ThreePoints)))
        );
        assert_eq!(
            parse_line("param name north star", 1).unwrap(),
            Some(ScriptCommand::Param {
                name: "name".into(),
                values: vec!["north".into(), "star".into()],
            })
        );
        assert_eq!(
            parse_line("click-world 1 -2 # trailing", 1).unwrap(),
            Some(ScriptCommand::ClickWorld(Point::new(1.0, -2.0)))
        );
    }

    #[test]
    fn test_parse_errors_carry_line() {
        let err = parse_script("mode draw\nclick-world 1\n").unwrap_err();
        assert!(matches!(err, ScriptError::Parse { line: 2, .. }));
        assert!(matches!(parse_line("jump", 7), Err(ScriptError::Parse { line: 7, .. })));
        assert!(matches!(parse_line("undo now", 3), Err(ScriptError::Parse { line: 3, .. })));
        assert!(matches!(parse_line("tool line sideways", 1), Err(ScriptError::Parse { .. })));
    }

    #[test]
    fn test_construction_script() {
        let dir = TempDir::new().unwrap();
        let mut s = session(&dir);
        s.run(
            "tool point\n\
             click-world 0 0\n\
             click-world 2 0\n\
             tool construct midpoint\n\
             click-world 0 0\n\
             click-world 2 0\n\
             tool line angle\n",
        )
        .unwrap();
        assert_eq!(s.canvas.document.len(), 3);
        assert_eq!(s.canvas.tools.current_tool, ToolKind::Line(LineMode::AngleCalculator));
        assert_eq!(s.frames(), 7);
    }

    #[test]
    fn test_screen_events_in_draw_mode() {
        let dir = TempDir::new().unwrap();
        let mut s = session(&dir);
        // Default view (-2, 2, -1.5, 1.5) on a 1024x720 framebuffer.
        s.run(
            "key p\n\
             tool line segment\n\
             down left 512 360\n\
             up left\n\
             move 768 360\n\
             down left 768 360\n",
        )
        .unwrap();
        let shapes = s.canvas.document.shapes();
        assert_eq!(shapes.len(), 1);
        let line = shapes[0].as_line().unwrap();
        assert_eq!((line.p1, line.p2), (Point::new(0.0, 0.0), Point::new(1.0, 0.0)));
    }

    #[test]
    fn test_parameter_tools_and_color() {
        let dir = TempDir::new().unwrap();
        let mut s = session(&dir);
        s.run(
            "color 1 0 0\n\
             tool circle center-radius\n\
             param radius 0.75\n\
             click-world 0.5 0.5\n\
             commit\n\
             tool point-input\n\
             param position 3 4\n\
             commit\n",
        )
        .unwrap();
        let shapes = s.canvas.document.shapes();
        assert_eq!(shapes.len(), 2);
        assert_eq!(shapes[0].kind(), ShapeKind::Circle);
        assert_eq!(shapes[0].color(), Rgb::new(1.0, 0.0, 0.0));
        assert_eq!(shapes[1].as_point().unwrap().position, Point::new(3.0, 4.0));

        let err = s.run("param radius wide\n").unwrap_err();
        assert!(matches!(err, ScriptError::Parse { line: 1, .. }));
    }

    #[test]
    fn test_angle_measurement_is_recorded() {
        let dir = TempDir::new().unwrap();
        let mut s = session(&dir);
        s.run(
            "tool line segment\n\
             click-world -1 0\n\
             click-world 1 0\n\
             click-world 0 -1\n\
             click-world 0 1\n\
             tool line angle\n\
             click-world 0.5 0\n\
             click-world 0 0.5\n",
        )
        .unwrap();
        assert_eq!(s.measurements.len(), 1);
        assert!((s.measurements[0] - 90.0).abs() < 1e-9);
    }

    #[test]
    fn test_angle_measured_with_pointer_events() {
        let dir = TempDir::new().unwrap();
        let mut s = session(&dir);
        // (0.5, 0) and (0, 0.5) on the default 1024x720 framebuffer.
        s.run(
            "tool line segment\n\
             click-world -1 0\n\
             click-world 1 0\n\
             click-world 0 -1\n\
             click-world 0 1\n\
             mode draw\n\
             tool line angle\n\
             down left 640 360\n\
             up left\n\
             down left 512 240\n",
        )
        .unwrap();
        assert_eq!(s.measurements.len(), 1);
        assert!((s.measurements[0] - 90.0).abs() < 1e-9);
    }

    #[test]
    fn test_save_and_load_through_script() {
        let dir = TempDir::new().unwrap();
        let mut s = session(&dir);
        s.run(
            "tool polyline\n\
             click-world 0 0\n\
             click-world 1 0\n\
             click-world 1 1\n\
             finish\n\
             save drawing.txt\n\
             undo\n",
        )
        .unwrap();
        assert!(s.canvas.document.is_empty());
        assert!(dir.path().join("drawing.txt").exists());

        s.run("load drawing.txt\nload missing.txt\n").unwrap();
        assert_eq!(s.canvas.document.len(), 1);
        assert_eq!(s.canvas.document.shapes()[0].kind(), ShapeKind::Polyline);
        assert_eq!(s.warnings.len(), 1);
        assert!(s.warnings[0].starts_with("line 2: load missing.txt"));
    }
}
