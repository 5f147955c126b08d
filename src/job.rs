//! One drill-to-G-code conversion, from input files to a written program.

use anyhow::{Context, Result};
use pcbdrill_camtools::{
    emit, load_outline, parse, plan_drilling, route_outline, CamToolError, CavalierOffset,
    HoleGroup, ProgramHeader,
};
use pcbdrill_core::GeometryWarning;
use pcbdrill_settings::Config;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Input files and the settings to convert them with.
#[derive(Debug, Clone)]
pub struct ConversionJob {
    pub input: PathBuf,
    pub output: PathBuf,
    /// Gerber board outline to route after drilling
    pub outline: Option<PathBuf>,
    pub config: Config,
}

/// What a finished job produced.
#[derive(Debug, Clone, Default)]
pub struct JobSummary {
    pub hole_groups: Vec<HoleGroup>,
    pub straight_drilled: usize,
    pub spiral_milled: usize,
    pub slots_offset: usize,
    pub slots_centerline: usize,
    pub contours_routed: usize,
    pub contours_skipped: usize,
    pub warnings: Vec<GeometryWarning>,
    pub output: PathBuf,
}

impl ConversionJob {
    pub fn new(input: impl Into<PathBuf>, config: Config) -> Self {
        let input = input.into();
        Self {
            output: Self::default_output(&input),
            input,
            outline: None,
            config,
        }
    }

    /// `<input>.nc` next to the input file
    pub fn default_output(input: &Path) -> PathBuf {
        input.with_extension("nc")
    }

    /// Run the conversion and write the program.
    ///
    /// Nothing is written unless every step succeeds.
    pub fn run(&self) -> Result<JobSummary> {
        self.config.validate().context("Invalid milling settings")?;
        let params = &self.config.milling;

        let drill_text = std::fs::read_to_string(&self.input)
            .with_context(|| format!("Failed to read drill file {}", self.input.display()))?;
        let drill = parse(&drill_text)
            .with_context(|| format!("Failed to parse drill file {}", self.input.display()))?;
        info!(
            "Read {} holes and {} slots from {}",
            drill.hole_count(),
            drill.slot_count(),
            self.input.display()
        );

        let plan = plan_drilling(&drill, params, Some(&CavalierOffset))
            .context("Failed to generate drilling toolpaths")?;

        let mut summary = JobSummary {
            hole_groups: drill.hole_groups(),
            straight_drilled: plan.straight_drilled,
            spiral_milled: plan.spiral_milled,
            slots_offset: plan.slots_offset,
            slots_centerline: plan.slots_centerline,
            warnings: plan.warnings,
            output: self.output.clone(),
            ..Default::default()
        };
        let mut groups = plan.groups;

        let mut header = ProgramHeader::new(
            format!("pcbdrill {}", crate::VERSION),
            display_name(&self.input),
            params,
        );
        header.hole_count = drill.hole_count();
        header.slot_count = drill.slot_count();
        header.dwell_seconds = self.config.program.dwell_seconds;

        if let Some(outline_path) = &self.outline {
            let outline_text = std::fs::read_to_string(outline_path).with_context(|| {
                format!("Failed to read outline file {}", outline_path.display())
            })?;
            let geometry = load_outline(&outline_text).with_context(|| {
                format!("Failed to read outline from {}", outline_path.display())
            })?;
            summary.warnings.extend(geometry.warnings);

            let outline_params = self.config.outline_params();
            let routing = route_outline(
                &geometry.contours,
                outline_params.bit_diameter_mm,
                outline_params.depth_mm,
                params,
                &CavalierOffset,
            );
            summary.contours_routed = routing.routed;
            summary.contours_skipped = routing.skipped;
            summary.warnings.extend(routing.warnings);
            groups.extend(routing.groups);
            header.outline_name = Some(display_name(outline_path));
        }

        for warning in &summary.warnings {
            warn!("{}", warning);
        }

        let gcode = emit(&header, &groups);
        std::fs::write(&self.output, gcode)
            .with_context(|| format!("Failed to write {}", self.output.display()))?;
        info!("Wrote {}", self.output.display());

        Ok(summary)
    }
}

/// Whether a job failed because the drill or outline data was malformed,
/// as opposed to bad settings or an unreadable file.
pub fn is_input_error(err: &anyhow::Error) -> bool {
    err.chain().any(|cause| {
        cause
            .downcast_ref::<pcbdrill_core::Error>()
            .is_some_and(pcbdrill_core::Error::is_input_error)
            || cause
                .downcast_ref::<CamToolError>()
                .is_some_and(CamToolError::is_input_error)
    })
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

impl JobSummary {
    pub fn slot_count(&self) -> usize {
        self.slots_offset + self.slots_centerline
    }
}

impl fmt::Display for JobSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Hole sizes:")?;
        for group in &self.hole_groups {
            writeln!(f, "  {:>8.4} mm  x {}", group.diameter_mm, group.count)?;
        }
        writeln!(f, "Straight drilled: {}", self.straight_drilled)?;
        writeln!(f, "Spiral milled: {}", self.spiral_milled)?;
        if self.slot_count() > 0 {
            writeln!(
                f,
                "Slots routed: {} ({} offset, {} centerline)",
                self.slot_count(),
                self.slots_offset,
                self.slots_centerline
            )?;
        }
        if self.contours_routed + self.contours_skipped > 0 {
            writeln!(
                f,
                "Outline contours: {} routed, {} skipped",
                self.contours_routed, self.contours_skipped
            )?;
        }
        if !self.warnings.is_empty() {
            writeln!(f, "Warnings:")?;
            for warning in &self.warnings {
                writeln!(f, "  {}", warning)?;
            }
        }
        write!(f, "Output: {}", self.output.display())
    }
}
