//! Excellon drill file parser
//!
//! Walks the file line by line with an explicit [`ParserState`], tracking
//! the header/body section, the active number format, the tool table, the
//! selected tool and the current position. Produces the tool table and the
//! ordered list of holes and routed slots.
//!
//! Routed slots are recognised from the positioning idiom most CAD tools
//! export:
//!
//! ```text
//! G00X10.0Y5.0
//! M15
//! G01X12.0Y5.0
//! M16
//! ```
//!
//! A `G00` followed under the same tool by a `G01` to a different point is
//! one slot; further `G01` moves continue the route as more slot segments.
//! A `G00` that is not followed that way is a lone coordinate, so it is a
//! hole. Canned `G85` slots are read directly.

use crate::coordinate::decode;
use pcbdrill_core::{
    DrillOperation, Error, FormatError, FormatSpec, Hole, ParseError, Point, SlotCandidate, Tool,
    Unit, ZeroSuppression,
};
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// Result of parsing one drill file.
#[derive(Debug, Clone)]
pub struct ExcellonFile {
    /// Number format in effect at the end of the file
    pub format: FormatSpec,
    /// Tools in definition order
    pub tools: Vec<Tool>,
    /// Holes and slots in file order
    pub operations: Vec<DrillOperation>,
}

/// Count of holes sharing one diameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HoleGroup {
    pub diameter_mm: f64,
    pub count: usize,
}

impl ExcellonFile {
    pub fn tool(&self, id: &str) -> Option<&Tool> {
        self.tools.iter().find(|t| t.id == id)
    }

    pub fn holes(&self) -> impl Iterator<Item = &Hole> {
        self.operations.iter().filter_map(|op| match op {
            DrillOperation::Hole(hole) => Some(hole),
            DrillOperation::Slot(_) => None,
        })
    }

    pub fn slots(&self) -> impl Iterator<Item = &SlotCandidate> {
        self.operations.iter().filter_map(|op| match op {
            DrillOperation::Slot(slot) => Some(slot),
            DrillOperation::Hole(_) => None,
        })
    }

    pub fn hole_count(&self) -> usize {
        self.holes().count()
    }

    pub fn slot_count(&self) -> usize {
        self.slots().count()
    }

    /// Holes grouped by tool diameter, smallest first.
    pub fn hole_groups(&self) -> Vec<HoleGroup> {
        let mut groups: Vec<HoleGroup> = Vec::new();
        for hole in self.holes() {
            let Some(tool) = self.tool(&hole.tool_id) else {
                continue;
            };
            match groups
                .iter_mut()
                .find(|g| (g.diameter_mm - tool.diameter_mm).abs() < 1e-9)
            {
                Some(group) => group.count += 1,
                None => groups.push(HoleGroup {
                    diameter_mm: tool.diameter_mm,
                    count: 1,
                }),
            }
        }
        groups.sort_by(|a, b| a.diameter_mm.total_cmp(&b.diameter_mm));
        groups
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Header,
    Body,
}

/// Progress through a `G00`/`G01` routed slot.
#[derive(Debug, Clone, PartialEq)]
enum Route {
    Idle,
    /// `G00` seen; becomes a hole unless a `G01` follows
    Positioned { at: Point, line_number: usize },
    /// At least one slot segment emitted; `G01` extends the route
    Routing { at: Point },
}

#[derive(Debug)]
struct ParserState {
    section: Section,
    format: FormatSpec,
    tools: Vec<Tool>,
    tool_index: HashMap<String, usize>,
    current_tool: Option<String>,
    position: Point,
    route: Route,
    operations: Vec<DrillOperation>,
}

impl Default for ParserState {
    fn default() -> Self {
        Self {
            section: Section::Header,
            format: FormatSpec::default(),
            tools: Vec::new(),
            tool_index: HashMap::new(),
            current_tool: None,
            position: Point::default(),
            route: Route::Idle,
            operations: Vec::new(),
        }
    }
}

/// Parse the text of an Excellon drill file.
///
/// # Errors
///
/// Any malformed coordinate or header directive is a [`FormatError`]; a
/// coordinate without a defined, selected tool or a file without any hole
/// is a [`ParseError`]. Nothing is recovered locally.
pub fn parse(content: &str) -> Result<ExcellonFile, Error> {
    let mut state = ParserState::default();

    for (index, raw_line) in content.lines().enumerate() {
        let line_number = index + 1;
        let line = raw_line.trim().to_ascii_uppercase();
        if line.is_empty() {
            continue;
        }
        if !process_line(&line, line_number, &mut state)? {
            debug!("End of program at line {}", line_number);
            break;
        }
    }

    state.flush_route()?;

    if state.operations.is_empty() {
        return Err(ParseError::NoHoles.into());
    }

    let file = ExcellonFile {
        format: state.format,
        tools: state.tools,
        operations: state.operations,
    };
    info!(
        "Parsed {} holes and {} slots ({} tools, format {})",
        file.hole_count(),
        file.slot_count(),
        file.tools.len(),
        file.format
    );
    Ok(file)
}

/// Handle one normalised line. Returns `false` at an end-of-program marker.
fn process_line(line: &str, line_number: usize, state: &mut ParserState) -> Result<bool, Error> {
    if let Some(comment) = line.strip_prefix(';') {
        if let Some(format) = comment.trim().strip_prefix("FILE_FORMAT=") {
            apply_file_format(line, format, state)?;
        }
        return Ok(true);
    }

    match line {
        "M48" => {
            state.section = Section::Header;
            return Ok(true);
        }
        "%" | "M95" => {
            if state.section == Section::Header {
                state.section = Section::Body;
            }
            return Ok(true);
        }
        "M30" | "M00" => return Ok(false),
        "LZ" => {
            state.format.zero_suppression = ZeroSuppression::Lz;
            return Ok(true);
        }
        "TZ" => {
            state.format.zero_suppression = ZeroSuppression::Tz;
            return Ok(true);
        }
        "M71" => {
            state.format.unit = Unit::Metric;
            return Ok(true);
        }
        "M72" => {
            state.format.unit = Unit::Inch;
            return Ok(true);
        }
        "M16" | "M17" | "G05" => {
            state.flush_route()?;
            return Ok(true);
        }
        _ => {}
    }

    if line.starts_with("METRIC") || line.starts_with("INCH") {
        apply_unit_directive(line, state)?;
        return Ok(true);
    }

    if let Some(rest) = line.strip_prefix('T') {
        if rest.starts_with(|c: char| c.is_ascii_digit()) {
            if rest.contains('C') {
                define_tool(line, rest, state)?;
            } else {
                select_tool(rest, state)?;
            }
            return Ok(true);
        }
    }

    if let Some((from, to)) = line.split_once("G85") {
        state.section = Section::Body;
        state.flush_route()?;
        let start = state.read_position(from, line, line_number)?;
        state.position = start;
        let end = state.read_position(to, line, line_number)?;
        state.position = end;
        state.push_slot(start, end, line_number)?;
        return Ok(true);
    }

    if line.starts_with('X') || line.starts_with('Y') {
        state.section = Section::Body;
        state.flush_route()?;
        let target = state.read_position(line, line, line_number)?;
        state.position = target;
        state.push_hole(target, line_number)?;
        return Ok(true);
    }

    if let Some(rest) = line.strip_prefix('G') {
        let code_len = rest.find(|c: char| !c.is_ascii_digit()).unwrap_or(rest.len());
        let (code, coords) = rest.split_at(code_len);
        if !coords.is_empty() && (coords.starts_with('X') || coords.starts_with('Y')) {
            state.section = Section::Body;
            match code.parse::<u32>() {
                Ok(0) => state.rapid_to(coords, line, line_number)?,
                Ok(1) => state.linear_to(coords, line, line_number)?,
                Ok(2) | Ok(3) => {
                    warn!(
                        "Circular routing at line {} is not supported; skipped: {}",
                        line_number, line
                    );
                    state.flush_route()?;
                    state.position = state.read_position(coords, line, line_number)?;
                }
                _ => {
                    return Err(ParseError::InvalidCommand {
                        line_number,
                        line: line.to_string(),
                    }
                    .into())
                }
            }
            return Ok(true);
        }
    }

    // Housekeeping: M15, G90, FMAT, VER, ICI, DETECT, ATC, ...
    debug!("Ignoring line {}: {}", line_number, line);
    Ok(true)
}

/// `;FILE_FORMAT=i:d`
fn apply_file_format(line: &str, format: &str, state: &mut ParserState) -> Result<(), Error> {
    let Some((int_raw, dec_raw)) = format.trim().split_once(':') else {
        return Err(FormatError::InvalidHeader {
            line: line.to_string(),
            reason: "expected <integer digits>:<decimal digits>".to_string(),
        }
        .into());
    };
    let integer_digits = parse_digit_count(line, int_raw)?;
    let decimal_digits = parse_digit_count(line, dec_raw)?;
    state.format = state.format.with_digits(integer_digits, decimal_digits)?;
    debug!("File format {}:{}", integer_digits, decimal_digits);
    Ok(())
}

fn parse_digit_count(line: &str, raw: &str) -> Result<u8, FormatError> {
    raw.trim()
        .parse::<u8>()
        .map_err(|e| FormatError::InvalidHeader {
            line: line.to_string(),
            reason: format!("invalid digit count '{}': {}", raw.trim(), e),
        })
}

/// `METRIC`, `INCH`, optionally followed by `,LZ`/`,TZ` and a digit template such as `,000.000`.
fn apply_unit_directive(line: &str, state: &mut ParserState) -> Result<(), Error> {
    let mut fields = line.split(',').map(str::trim);
    state.format.unit = fields
        .next()
        .unwrap_or_default()
        .parse::<Unit>()
        .map_err(|reason| FormatError::InvalidHeader {
            line: line.to_string(),
            reason,
        })?;

    for field in fields {
        match field {
            "LZ" => state.format.zero_suppression = ZeroSuppression::Lz,
            "TZ" => state.format.zero_suppression = ZeroSuppression::Tz,
            template if template.contains('.') => {
                let (int_part, dec_part) = template.split_once('.').unwrap_or((template, ""));
                let valid = |s: &str| s.chars().all(|c| c == '0' || c == '#');
                if !valid(int_part) || !valid(dec_part) {
                    return Err(FormatError::InvalidHeader {
                        line: line.to_string(),
                        reason: format!("invalid digit template '{}'", template),
                    }
                    .into());
                }
                state.format = state
                    .format
                    .with_digits(int_part.len() as u8, dec_part.len() as u8)?;
            }
            other => debug!("Ignoring unit option '{}'", other),
        }
    }

    debug!(
        "Coordinates in {} ({})",
        state.format.unit.label(),
        state.format.zero_suppression
    );
    Ok(())
}

/// `T<id>C<diameter>`, with any `F`/`S`/`B`/`H`/`Z` fields ignored.
fn define_tool(line: &str, rest: &str, state: &mut ParserState) -> Result<(), Error> {
    let (number, fields) = split_tool_number(rest);
    let invalid = |reason: String| ParseError::InvalidToolDefinition {
        line: line.to_string(),
        reason,
    };

    let Some(c_index) = fields.find('C') else {
        return Err(invalid("missing C diameter field".to_string()).into());
    };
    let after_c = &fields[c_index + 1..];
    let value_len = after_c
        .find(|c: char| c.is_ascii_alphabetic())
        .unwrap_or(after_c.len());
    let raw = &after_c[..value_len];
    let diameter: f64 = raw
        .parse()
        .map_err(|e| invalid(format!("invalid diameter '{}': {}", raw, e)))?;
    if !(diameter > 0.0) {
        return Err(invalid(format!("diameter must be positive, got {}", diameter)).into());
    }

    let id = tool_id(number);
    let tool = Tool {
        id: id.clone(),
        diameter_mm: state.format.unit.to_mm(diameter),
    };
    debug!("Tool {}: {:.4} mm", tool.id, tool.diameter_mm);

    match state.tool_index.get(&id) {
        Some(&index) => {
            warn!("Tool {} redefined; last definition wins", id);
            state.tools[index] = tool;
        }
        None => {
            state.tool_index.insert(id, state.tools.len());
            state.tools.push(tool);
        }
    }
    Ok(())
}

fn select_tool(rest: &str, state: &mut ParserState) -> Result<(), Error> {
    let (number, _) = split_tool_number(rest);
    state.section = Section::Body;
    state.flush_route()?;

    if number.trim_start_matches('0').is_empty() {
        debug!("Tool unloaded");
        state.current_tool = None;
        return Ok(());
    }

    let id = tool_id(number);
    if !state.tool_index.contains_key(&id) {
        // Only fatal if a coordinate is actually drilled with it
        warn!("Tool {} selected but not defined", id);
    }
    debug!("Selected tool {}", id);
    state.current_tool = Some(id);
    Ok(())
}

fn split_tool_number(rest: &str) -> (&str, &str) {
    let len = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    rest.split_at(len)
}

/// `T01` and `T1` name the same tool.
fn tool_id(number: &str) -> String {
    let trimmed = number.trim_start_matches('0');
    if trimmed.is_empty() {
        "T0".to_string()
    } else {
        format!("T{}", trimmed)
    }
}

impl ParserState {
    /// Decode an `X…Y…`, `X…` or `Y…` word pair against the current position.
    fn read_position(
        &self,
        coords: &str,
        line: &str,
        line_number: usize,
    ) -> Result<Point, Error> {
        let coords = coords.trim();
        let (x_raw, y_raw) = if let Some(after_x) = coords.strip_prefix('X') {
            match after_x.split_once('Y') {
                Some((x, y)) => (Some(x), Some(y)),
                None => (Some(after_x), None),
            }
        } else if let Some(after_y) = coords.strip_prefix('Y') {
            (None, Some(after_y))
        } else if coords.is_empty() {
            (None, None)
        } else {
            return Err(ParseError::InvalidCommand {
                line_number,
                line: line.to_string(),
            }
            .into());
        };

        let x = match x_raw {
            Some(raw) => decode(raw, &self.format)?,
            None => self.position.x,
        };
        let y = match y_raw {
            Some(raw) => decode(raw, &self.format)?,
            None => self.position.y,
        };
        Ok(Point::new(x, y))
    }

    fn active_tool(&self, line_number: usize) -> Result<String, ParseError> {
        let Some(id) = &self.current_tool else {
            return Err(ParseError::NoToolSelected { line_number });
        };
        if !self.tool_index.contains_key(id) {
            return Err(ParseError::UnknownTool {
                tool: id.clone(),
                line_number,
            });
        }
        Ok(id.clone())
    }

    fn push_hole(&mut self, at: Point, line_number: usize) -> Result<(), Error> {
        let tool_id = self.active_tool(line_number)?;
        self.operations.push(DrillOperation::Hole(Hole {
            x_mm: at.x,
            y_mm: at.y,
            tool_id,
        }));
        Ok(())
    }

    fn push_slot(&mut self, start: Point, end: Point, line_number: usize) -> Result<(), Error> {
        let tool_id = self.active_tool(line_number)?;
        debug!(
            "Slot {} from ({:.4}, {:.4}) to ({:.4}, {:.4})",
            tool_id, start.x, start.y, end.x, end.y
        );
        self.operations.push(DrillOperation::Slot(SlotCandidate {
            start,
            end,
            tool_id,
        }));
        Ok(())
    }

    /// End any routed sequence; a pending `G00` position becomes a hole.
    fn flush_route(&mut self) -> Result<(), Error> {
        if let Route::Positioned { at, line_number } = std::mem::replace(&mut self.route, Route::Idle)
        {
            self.push_hole(at, line_number)?;
        }
        Ok(())
    }

    fn rapid_to(&mut self, coords: &str, line: &str, line_number: usize) -> Result<(), Error> {
        self.flush_route()?;
        let at = self.read_position(coords, line, line_number)?;
        self.position = at;
        self.route = Route::Positioned { at, line_number };
        Ok(())
    }

    fn linear_to(&mut self, coords: &str, line: &str, line_number: usize) -> Result<(), Error> {
        let target = self.read_position(coords, line, line_number)?;
        self.position = target;

        let from = match &self.route {
            Route::Positioned { at, .. } | Route::Routing { at } => Some(*at),
            Route::Idle => None,
        };

        match from {
            Some(start) if start.distance_to(&target) > 1e-9 => {
                self.route = Route::Routing { at: target };
                self.push_slot(start, target, line_number)
            }
            // Zero-length route: the pending point is just a hole
            Some(_) => self.flush_route(),
            // A lone linear move is a single coordinate
            None => self.push_hole(target, line_number),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    #[test]
    fn test_tool_id_normalised() {
        assert_eq!(tool_id("01"), "T1");
        assert_eq!(tool_id("12"), "T12");
        assert_eq!(tool_id("00"), "T0");
    }

    #[test]
    fn test_minimal_metric_file() {
        let input = "M48\nMETRIC,TZ\nT1C0.8\n%\nT1\nX10.0Y20.0\nX15.5\nY-3.0\nM30\n";
        let file = parse(input).unwrap();
        assert_eq!(file.tools.len(), 1);
        let holes: Vec<&Hole> = file.holes().collect();
        assert_eq!(holes.len(), 3);
        assert!((holes[1].x_mm - 15.5).abs() < EPSILON);
        assert!((holes[1].y_mm - 20.0).abs() < EPSILON);
        assert!((holes[2].x_mm - 15.5).abs() < EPSILON);
        assert!((holes[2].y_mm + 3.0).abs() < EPSILON);
    }

    #[test]
    fn test_file_format_comment_sets_digits() {
        let input = ";FILE_FORMAT=3:3\nMETRIC,TZ\nT1C1.0\n%\nT1\nX12345Y500\nM30\n";
        let file = parse(input).unwrap();
        assert_eq!(file.format.integer_digits, 3);
        assert_eq!(file.format.decimal_digits, 3);
        let hole = file.holes().next().unwrap();
        assert!((hole.x_mm - 12.345).abs() < EPSILON);
        assert!((hole.y_mm - 0.5).abs() < EPSILON);
    }

    #[test]
    fn test_unit_template_sets_digits() {
        let input = "M48\nINCH,LZ,00.0000\nT1C0.04\n%\nT1\nX01Y005\nM30\n";
        let file = parse(input).unwrap();
        assert_eq!(file.format.integer_digits, 2);
        assert_eq!(file.format.decimal_digits, 4);
        assert_eq!(file.format.unit, Unit::Inch);
        assert!((file.tools[0].diameter_mm - 1.016).abs() < EPSILON);
        let hole = file.holes().next().unwrap();
        // Left-aligned: "01" is 01.0000 in, "005" is 00.5000 in
        assert!((hole.x_mm - 25.4).abs() < EPSILON);
        assert!((hole.y_mm - 12.7).abs() < EPSILON);
    }

    #[test]
    fn test_malformed_file_format_is_fatal() {
        let input = ";FILE_FORMAT=four\nT1C1.0\n%\nT1\nX1.0Y1.0\n";
        let err = parse(input).unwrap_err();
        assert!(matches!(
            err,
            Error::Format(FormatError::InvalidHeader { .. })
        ));
    }

    #[test]
    fn test_no_coordinates_is_parse_error() {
        let input = "M48\nMETRIC\nT1C0.8\n%\nT1\nM30\n";
        let err = parse(input).unwrap_err();
        assert!(matches!(err, Error::Parse(ParseError::NoHoles)));
        assert_eq!(err.to_string(), "no holes found");
    }

    #[test]
    fn test_coordinate_before_tool_is_fatal() {
        let input = "M48\nMETRIC\nT1C0.8\n%\nX1.0Y1.0\n";
        let err = parse(input).unwrap_err();
        assert!(matches!(
            err,
            Error::Parse(ParseError::NoToolSelected { line_number: 5 })
        ));
    }

    #[test]
    fn test_undefined_tool_is_fatal_only_when_used() {
        let input = "M48\nMETRIC\nT1C0.8\n%\nT9\nT1\nX1.0Y1.0\nT9\nX2.0Y2.0\n";
        let err = parse(input).unwrap_err();
        assert!(matches!(
            err,
            Error::Parse(ParseError::UnknownTool { ref tool, line_number: 9 }) if tool == "T9"
        ));
    }

    #[test]
    fn test_padded_tool_numbers_match() {
        let input = "M48\nMETRIC\nT01C0.8\n%\nT1\nX1.0Y1.0\nT01\nX2.0Y2.0\nM30\n";
        let file = parse(input).unwrap();
        assert_eq!(file.hole_count(), 2);
        assert!(file.holes().all(|h| h.tool_id == "T1"));
    }

    #[test]
    fn test_tool_definition_ignores_feed_and_speed() {
        let input = "M48\nMETRIC\nT1F00S00C0.3000\nT2C1.2F200S65\n%\nT2\nX1.0Y1.0\n";
        let file = parse(input).unwrap();
        assert!((file.tool("T1").unwrap().diameter_mm - 0.3).abs() < EPSILON);
        assert!((file.tool("T2").unwrap().diameter_mm - 1.2).abs() < EPSILON);
    }

    #[test]
    fn test_routed_slot_pair() {
        let input = "M48\nMETRIC\nT3C1.5\n%\nT3\nG00X10.0Y5.0\nM15\nG01X14.0Y5.0\nM16\nG05\nM30\n";
        let file = parse(input).unwrap();
        assert_eq!(file.hole_count(), 0);
        let slots: Vec<&SlotCandidate> = file.slots().collect();
        assert_eq!(slots.len(), 1);
        assert_eq!(slots[0].start, Point::new(10.0, 5.0));
        assert_eq!(slots[0].end, Point::new(14.0, 5.0));
        assert_eq!(slots[0].tool_id, "T3");
    }

    #[test]
    fn test_lone_rapid_is_a_hole() {
        let input = "M48\nMETRIC\nT1C0.8\n%\nT1\nG00X1.0Y1.0\nX2.0Y2.0\nG00X3.0Y3.0\nM30\n";
        let file = parse(input).unwrap();
        assert_eq!(file.slot_count(), 0);
        let holes: Vec<&Hole> = file.holes().collect();
        assert_eq!(holes.len(), 3);
        assert!((holes[0].x_mm - 1.0).abs() < EPSILON);
        assert!((holes[2].x_mm - 3.0).abs() < EPSILON);
    }

    #[test]
    fn test_tool_change_breaks_slot_pair() {
        let input =
            "M48\nMETRIC\nT1C0.8\nT2C1.0\n%\nT1\nG00X1.0Y1.0\nT2\nG01X5.0Y1.0\nM30\n";
        let file = parse(input).unwrap();
        assert_eq!(file.slot_count(), 0);
        let holes: Vec<&Hole> = file.holes().collect();
        assert_eq!(holes.len(), 2);
        assert_eq!(holes[0].tool_id, "T1");
        assert_eq!(holes[1].tool_id, "T2");
    }

    #[test]
    fn test_chained_route_segments() {
        let input = "M48\nMETRIC\nT1C1.2\n%\nT1\nG00X0.0Y0.0\nM15\nG01X5.0Y0.0\nG01X5.0Y3.0\nM16\nM30\n";
        let file = parse(input).unwrap();
        let slots: Vec<&SlotCandidate> = file.slots().collect();
        assert_eq!(slots.len(), 2);
        assert_eq!(slots[1].start, Point::new(5.0, 0.0));
        assert_eq!(slots[1].end, Point::new(5.0, 3.0));
    }

    #[test]
    fn test_canned_g85_slot() {
        let input = "M48\nMETRIC\nT1C1.0\n%\nT1\nX1.0Y2.0G85X6.0Y2.0\nM30\n";
        let file = parse(input).unwrap();
        let slot = file.slots().next().unwrap();
        assert_eq!(slot.start, Point::new(1.0, 2.0));
        assert_eq!(slot.end, Point::new(6.0, 2.0));
    }

    #[test]
    fn test_body_unit_switch() {
        let input = "M48\nMETRIC,TZ\nT1C1.0\n%\nT1\nX1.0Y1.0\nM72\nX1.0Y1.0\nM30\n";
        let file = parse(input).unwrap();
        let holes: Vec<&Hole> = file.holes().collect();
        assert!((holes[0].x_mm - 1.0).abs() < EPSILON);
        assert!((holes[1].x_mm - 25.4).abs() < EPSILON);
    }

    #[test]
    fn test_hole_groups_sorted_by_diameter() {
        let input = "M48\nMETRIC\nT1C3.0\nT2C0.8\n%\nT1\nX1.0Y1.0\nT2\nX2.0Y2.0\nX3.0Y3.0\nM30\n";
        let file = parse(input).unwrap();
        let groups = file.hole_groups();
        assert_eq!(groups.len(), 2);
        assert!((groups[0].diameter_mm - 0.8).abs() < EPSILON);
        assert_eq!(groups[0].count, 2);
        assert_eq!(groups[1].count, 1);
    }

    #[test]
    fn test_lines_after_end_marker_ignored() {
        let input = "M48\nMETRIC\nT1C1.0\n%\nT1\nX1.0Y1.0\nM30\nX2.0Y2.0\n";
        let file = parse(input).unwrap();
        assert_eq!(file.hole_count(), 1);
    }
}
