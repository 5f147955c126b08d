//! Move groups for every hole and slot of a drill file, in file order.

use crate::error::{CamToolError, CamToolResult};
use crate::excellon::ExcellonFile;
use crate::hole_path::{describe_hole, select_strategy, synthesize_hole, HoleStrategy};
use crate::offset::PolygonOffset;
use crate::slot_router::{describe_slot, route_slot, SlotMethod};
use pcbdrill_core::{DrillOperation, GeometryWarning, MillingParams, MoveGroup};
use tracing::info;

#[derive(Debug, Clone, Default)]
pub struct DrillPlan {
    pub groups: Vec<MoveGroup>,
    pub straight_drilled: usize,
    pub spiral_milled: usize,
    pub slots_offset: usize,
    pub slots_centerline: usize,
    pub warnings: Vec<GeometryWarning>,
}

/// Synthesize every operation of `file`.
///
/// Slots are offset-routed only when `offsetter` is given.
pub fn plan_drilling(
    file: &ExcellonFile,
    params: &MillingParams,
    offsetter: Option<&dyn PolygonOffset>,
) -> CamToolResult<DrillPlan> {
    let mut plan = DrillPlan::default();

    for (index, op) in file.operations.iter().enumerate() {
        let tool = file.tool(op.tool_id()).ok_or_else(|| {
            CamToolError::GenerationFailed(format!(
                "operation {} uses undefined tool {}",
                index + 1,
                op.tool_id()
            ))
        })?;

        match op {
            DrillOperation::Hole(hole) => {
                match select_strategy(tool.diameter_mm, params) {
                    HoleStrategy::StraightPlunge => plan.straight_drilled += 1,
                    HoleStrategy::SpiralMill => plan.spiral_milled += 1,
                }
                plan.groups.push(MoveGroup::new(
                    describe_hole(hole, tool.diameter_mm, params),
                    synthesize_hole(hole, tool.diameter_mm, params),
                ));
            }
            DrillOperation::Slot(slot) => {
                let routing = route_slot(slot, tool.diameter_mm, params, offsetter);
                match routing.method {
                    SlotMethod::Offset => plan.slots_offset += 1,
                    SlotMethod::Centerline => plan.slots_centerline += 1,
                }
                plan.warnings.extend(routing.warning);
                plan.groups.push(MoveGroup::new(
                    format!("{} via {}", describe_slot(slot, tool.diameter_mm), routing.method),
                    routing.moves,
                ));
            }
        }
    }

    info!(
        "Planned {} straight drilled, {} spiral milled, {} slots",
        plan.straight_drilled,
        plan.spiral_milled,
        plan.slots_offset + plan.slots_centerline
    );
    Ok(plan)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::excellon::parse;
    use crate::offset::CavalierOffset;

    #[test]
    fn test_counts_by_strategy() {
        let input = "M48\nMETRIC\nT1C0.8\nT2C2.0\n%\nT1\nX1.0Y1.0\nT2\nX5.0Y5.0\nM30\n";
        let file = parse(input).unwrap();
        let plan = plan_drilling(&file, &MillingParams::default(), None).unwrap();
        assert_eq!(plan.straight_drilled, 1);
        assert_eq!(plan.spiral_milled, 1);
        assert_eq!(plan.groups.len(), 2);
        assert!(plan.groups[0].label.starts_with("straight drill T1"));
    }

    #[test]
    fn test_wide_slot_uses_offset() {
        let input = "M48\nMETRIC\nT1C2.0\n%\nT1\nG00X0.0Y0.0\nM15\nG01X6.0Y0.0\nM16\nM30\n";
        let file = parse(input).unwrap();
        let plan = plan_drilling(&file, &MillingParams::default(), Some(&CavalierOffset)).unwrap();
        assert_eq!(plan.slots_offset, 1);
        assert!(plan.groups[0].label.ends_with("via offset"));
        assert!(plan.warnings.is_empty());
    }
}
