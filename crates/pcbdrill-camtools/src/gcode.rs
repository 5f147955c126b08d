//! G-code program text
//!
//! The only place [`ToolMove`]s become text. Coordinates are written with 4
//! decimals (rapid Z with 3) and feeds with 1; nothing is rounded before
//! this point.

use pcbdrill_core::{MillingParams, MoveGroup, ToolMove};

/// Fixed program settings and the comment block at the top of the file.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgramHeader {
    /// Generator name and version
    pub generator: String,
    pub input_name: String,
    pub outline_name: Option<String>,
    pub bit_diameter_mm: f64,
    pub depth_mm: f64,
    pub hole_count: usize,
    pub slot_count: usize,
    pub spindle_speed: f64,
    /// Spindle spin-up pause (seconds)
    pub dwell_seconds: f64,
    pub safe_height_mm: f64,
}

impl ProgramHeader {
    pub fn new(generator: impl Into<String>, input_name: impl Into<String>, params: &MillingParams) -> Self {
        Self {
            generator: generator.into(),
            input_name: input_name.into(),
            outline_name: None,
            bit_diameter_mm: params.bit_diameter_mm,
            depth_mm: params.depth_mm,
            hole_count: 0,
            slot_count: 0,
            spindle_speed: params.spindle_speed,
            dwell_seconds: 2.0,
            safe_height_mm: params.safe_height_mm,
        }
    }
}

/// Render a complete program: header, one commented block per group, footer.
pub fn emit(header: &ProgramHeader, groups: &[MoveGroup]) -> String {
    let mut gcode = String::new();

    gcode.push_str(&format!("(Generated by {})\n", header.generator));
    gcode.push_str(&format!("(Input file: {})\n", header.input_name));
    if let Some(outline) = &header.outline_name {
        gcode.push_str(&format!("(Outline file: {})\n", outline));
    }
    gcode.push_str(&format!("(Bit size: {:.4} mm)\n", header.bit_diameter_mm));
    gcode.push_str(&format!("(Drill depth: {:.4} mm)\n", header.depth_mm));
    gcode.push_str(&format!("(Total holes: {})\n", header.hole_count));
    if header.slot_count > 0 {
        gcode.push_str(&format!("(Total slots: {})\n", header.slot_count));
    }
    gcode.push('\n');

    gcode.push_str("G21\n");
    gcode.push_str("G90\n");
    gcode.push_str("G94\n");
    gcode.push_str(&format!("M3 S{:.0}\n", header.spindle_speed));
    gcode.push_str(&format!("G4 P{:.1}\n", header.dwell_seconds));
    gcode.push_str(&format!("G0 Z{:.3}\n", header.safe_height_mm));

    for group in groups {
        gcode.push('\n');
        gcode.push_str(&format!("({})\n", comment_text(&group.label)));
        for m in &group.moves {
            gcode.push_str(&format_move(m));
            gcode.push('\n');
        }
    }

    gcode.push('\n');
    gcode.push_str(&format!("G0 Z{:.3}\n", header.safe_height_mm));
    gcode.push_str("M5\n");
    gcode.push_str("M2\n");
    gcode
}

/// One line of G-code for a move.
pub fn format_move(m: &ToolMove) -> String {
    let mut line = String::new();
    match *m {
        ToolMove::Rapid { x, y, z } => {
            line.push_str("G0");
            push_axis(&mut line, 'X', x, 4);
            push_axis(&mut line, 'Y', y, 4);
            push_axis(&mut line, 'Z', z, 3);
        }
        ToolMove::Linear { x, y, z, feed } => {
            line.push_str("G1");
            push_axis(&mut line, 'X', x, 4);
            push_axis(&mut line, 'Y', y, 4);
            push_axis(&mut line, 'Z', z, 4);
            line.push_str(&format!(" F{:.1}", feed));
        }
        ToolMove::Arc {
            x,
            y,
            z,
            i,
            j,
            clockwise,
            feed,
        } => {
            line.push_str(if clockwise { "G2" } else { "G3" });
            push_axis(&mut line, 'X', Some(x), 4);
            push_axis(&mut line, 'Y', Some(y), 4);
            push_axis(&mut line, 'Z', z, 4);
            push_axis(&mut line, 'I', Some(i), 4);
            push_axis(&mut line, 'J', Some(j), 4);
            line.push_str(&format!(" F{:.1}", feed));
        }
    }
    line
}

fn push_axis(line: &mut String, word: char, value: Option<f64>, decimals: usize) {
    if let Some(v) = value {
        line.push_str(&format!(" {}{:.*}", word, decimals, v));
    }
}

/// Parentheses cannot nest inside a G-code comment.
fn comment_text(label: &str) -> String {
    label.replace('(', "[").replace(')', "]")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rapid_formats() {
        assert_eq!(format_move(&ToolMove::rapid_xy(1.0, -2.5)), "G0 X1.0000 Y-2.5000");
        assert_eq!(format_move(&ToolMove::rapid_z(5.0)), "G0 Z5.000");
    }

    #[test]
    fn test_linear_formats() {
        assert_eq!(
            format_move(&ToolMove::linear_z(-2.0, 50.0)),
            "G1 Z-2.0000 F50.0"
        );
        assert_eq!(
            format_move(&ToolMove::linear_xyz(1.23457, 0.0, -0.5, 100.0)),
            "G1 X1.2346 Y0.0000 Z-0.5000 F100.0"
        );
    }

    #[test]
    fn test_arc_format() {
        let m = ToolMove::Arc {
            x: 11.0,
            y: 20.0,
            z: Some(-0.5),
            i: -1.0,
            j: 0.0,
            clockwise: true,
            feed: 50.0,
        };
        assert_eq!(
            format_move(&m),
            "G2 X11.0000 Y20.0000 Z-0.5000 I-1.0000 J0.0000 F50.0"
        );
    }

    #[test]
    fn test_comment_parentheses_replaced() {
        assert_eq!(comment_text("hole (T1)"), "hole [T1]");
    }
}
