//! Catalog tests: levels, edges, closures and root reduction of the fixed
//! pipeline workflows.

use pipelines_workflow::StepType::*;
use pipelines_workflow::{
    event_occurrence_workflow, event_workflow, occurrence_workflow, select_workflow,
    validator_workflow, StepType, WorkflowKind,
};
use pretty_assertions::assert_eq;
use rustc_hash::FxHashSet;

fn set(steps: &[StepType]) -> FxHashSet<StepType> {
    steps.iter().copied().collect()
}

// ============================================================================
// Occurrence workflow
// ============================================================================

#[test]
fn test_occurrence_levels() {
    let wf = occurrence_workflow();

    assert_eq!(wf.level_of(&DwcaToVerbatim), 1);
    assert_eq!(wf.level_of(&AbcdToVerbatim), 1);
    assert_eq!(wf.level_of(&XmlToVerbatim), 1);
    assert_eq!(wf.level_of(&VerbatimToIdentifier), 2);
    assert_eq!(wf.level_of(&VerbatimToInterpreted), 3);
    assert_eq!(wf.level_of(&InterpretedToIndex), 4);
    assert_eq!(wf.level_of(&HdfsView), 4);
    assert_eq!(wf.level_of(&Fragmenter), 4);
    assert_eq!(wf.level_of(&DataWarehouse), 5);
}

#[test]
fn test_occurrence_edges() {
    let wf = occurrence_workflow();

    for archive in [DwcaToVerbatim, XmlToVerbatim, AbcdToVerbatim] {
        assert_eq!(wf.edges_from(&archive), &[VerbatimToIdentifier]);
    }
    assert_eq!(wf.edges_from(&VerbatimToIdentifier), &[VerbatimToInterpreted]);
    assert_eq!(
        wf.edges_from(&VerbatimToInterpreted),
        &[InterpretedToIndex, HdfsView, Fragmenter]
    );
    assert!(wf.edges_from(&InterpretedToIndex).is_empty());
    assert!(wf.edges_from(&Fragmenter).is_empty());
    assert!(wf.edges_from(&DataWarehouse).is_empty());
}

#[test]
fn test_occurrence_closure() {
    let wf = occurrence_workflow();
    let closure = wf.all_implied_by(&[
        VerbatimToInterpreted,
        VerbatimToIdentifier,
        HdfsView,
        InterpretedToIndex,
    ]);

    assert_eq!(
        closure,
        set(&[
            VerbatimToIdentifier,
            VerbatimToInterpreted,
            HdfsView,
            InterpretedToIndex,
            Fragmenter,
            DataWarehouse,
        ])
    );
}

#[test]
fn test_occurrence_single_archive_root() {
    let wf = occurrence_workflow();
    let roots = wf.minimal_roots_for(&[
        DwcaToVerbatim,
        VerbatimToInterpreted,
        VerbatimToIdentifier,
        HdfsView,
        InterpretedToIndex,
    ]);

    assert_eq!(roots, vec![DwcaToVerbatim]);
}

#[test]
fn test_occurrence_root_without_archive_step() {
    let wf = occurrence_workflow();
    let roots = wf.minimal_roots_for(&[
        VerbatimToInterpreted,
        VerbatimToIdentifier,
        HdfsView,
        InterpretedToIndex,
    ]);

    assert_eq!(roots, vec![VerbatimToIdentifier]);
}

#[test]
fn test_two_archive_steps_are_both_roots() {
    let wf = occurrence_workflow();
    let roots = wf.minimal_roots_for(&[XmlToVerbatim, HdfsView, DwcaToVerbatim]);

    assert_eq!(roots, vec![XmlToVerbatim, DwcaToVerbatim]);
}

// ============================================================================
// Event + occurrence workflow
// ============================================================================

#[test]
fn test_event_occurrence_levels_and_edges() {
    let wf = event_occurrence_workflow();

    assert_eq!(wf.len(), 10);
    assert_eq!(wf.level_of(&InterpretedToIndex), 4);
    assert_eq!(wf.level_of(&HdfsView), 4);
    assert_eq!(wf.level_of(&Fragmenter), 4);
    assert_eq!(wf.level_of(&EventsVerbatimToInterpreted), 4);
    assert_eq!(wf.level_of(&EventsInterpretedToIndex), 5);
    assert_eq!(wf.level_of(&EventsHdfsView), 5);

    assert_eq!(wf.edges_from(&DwcaToVerbatim), &[VerbatimToIdentifier]);
    assert_eq!(
        wf.edges_from(&VerbatimToInterpreted),
        &[
            InterpretedToIndex,
            HdfsView,
            Fragmenter,
            EventsVerbatimToInterpreted
        ]
    );
    assert_eq!(
        wf.edges_from(&EventsVerbatimToInterpreted),
        &[EventsInterpretedToIndex, EventsHdfsView]
    );
    // Occurrence views no longer feed the warehouse; the event view does
    assert!(wf.edges_from(&HdfsView).is_empty());
    assert_eq!(wf.edges_from(&EventsHdfsView), &[DataWarehouse]);
}

#[test]
fn test_event_occurrence_closure_same_level() {
    let wf = event_occurrence_workflow();
    let closure = wf.all_implied_by(&[HdfsView, InterpretedToIndex, EventsVerbatimToInterpreted]);

    assert_eq!(
        closure,
        set(&[
            HdfsView,
            InterpretedToIndex,
            EventsVerbatimToInterpreted,
            EventsHdfsView,
            EventsInterpretedToIndex,
            DataWarehouse,
        ])
    );
}

#[test]
fn test_event_occurrence_roots_same_level() {
    let wf = event_occurrence_workflow();
    let roots = wf.minimal_roots_for(&[
        HdfsView,
        InterpretedToIndex,
        EventsVerbatimToInterpreted,
        EventsHdfsView,
        EventsInterpretedToIndex,
    ]);

    assert_eq!(
        roots,
        vec![HdfsView, InterpretedToIndex, EventsVerbatimToInterpreted]
    );
}

// ============================================================================
// Event-only and validator workflows
// ============================================================================

#[test]
fn test_event_edges() {
    let wf = event_workflow();

    assert_eq!(wf.roots(), vec![DwcaToVerbatim]);
    assert_eq!(wf.edges_from(&DwcaToVerbatim), &[EventsVerbatimToInterpreted]);
    assert_eq!(
        wf.edges_from(&EventsVerbatimToInterpreted),
        &[EventsInterpretedToIndex, EventsHdfsView]
    );
    assert_eq!(wf.edges_from(&EventsHdfsView), &[DataWarehouse]);
    assert!(!wf.contains(&VerbatimToIdentifier));
}

#[test]
fn test_validator_levels() {
    let wf = validator_workflow();

    assert_eq!(wf.roots(), vec![ValidatorUploadArchive]);
    assert_eq!(wf.level_of(&ValidatorUploadArchive), 1);
    assert_eq!(wf.level_of(&ValidatorValidateArchive), 2);
    for converter in [
        ValidatorDwcaToVerbatim,
        ValidatorXmlToVerbatim,
        ValidatorAbcdToVerbatim,
        ValidatorTabularToVerbatim,
    ] {
        assert_eq!(wf.level_of(&converter), 3);
        assert_eq!(wf.edges_from(&converter), &[ValidatorVerbatimToInterpreted]);
    }
    assert_eq!(wf.level_of(&ValidatorVerbatimToInterpreted), 4);
    assert_eq!(wf.level_of(&ValidatorInterpretedToIndex), 5);
    assert_eq!(wf.level_of(&ValidatorCollectMetrics), 6);
}

#[test]
fn test_validator_converters_share_interpretation() {
    let wf = validator_workflow();
    let roots = wf.minimal_roots_for(&[
        ValidatorTabularToVerbatim,
        ValidatorCollectMetrics,
        ValidatorDwcaToVerbatim,
    ]);

    assert_eq!(roots, vec![ValidatorTabularToVerbatim, ValidatorDwcaToVerbatim]);
    assert_eq!(
        wf.all_implied_by(&roots),
        set(&[
            ValidatorTabularToVerbatim,
            ValidatorDwcaToVerbatim,
            ValidatorVerbatimToInterpreted,
            ValidatorInterpretedToIndex,
            ValidatorCollectMetrics,
        ])
    );
}

#[test]
fn test_generic_conversion_step_is_in_no_workflow() {
    for kind in WorkflowKind::ALL {
        assert!(!kind.graph().contains(&ToVerbatim), "{kind}");
    }
}

// ============================================================================
// Selector and plan
// ============================================================================

#[test]
fn test_select_matches_catalog_shape() {
    let selected = select_workflow(true, false);
    let standalone = occurrence_workflow();

    assert_eq!(selected.len(), standalone.len());
    for step in standalone.nodes() {
        assert_eq!(selected.edges_from(step), standalone.edges_from(step));
        assert_eq!(selected.level_of(step), standalone.level_of(step));
    }
}

#[test]
fn test_select_without_content_is_empty() {
    let wf = select_workflow(false, false);

    assert_eq!(wf.len(), 0);
    assert!(wf.roots().is_empty());
    assert!(wf.all_implied_by(&[]).is_empty());
}

#[test]
fn test_plan_stages_for_event_occurrence() {
    let plan = event_occurrence_workflow().plan(&[EventsHdfsView, VerbatimToInterpreted]);

    assert_eq!(plan.roots, vec![VerbatimToInterpreted]);
    assert_eq!(
        plan.stages(),
        vec![
            (3, vec![VerbatimToInterpreted]),
            (
                4,
                vec![
                    InterpretedToIndex,
                    HdfsView,
                    Fragmenter,
                    EventsVerbatimToInterpreted
                ]
            ),
            (5, vec![EventsInterpretedToIndex, EventsHdfsView]),
            (6, vec![DataWarehouse]),
        ]
    );
}

#[test]
#[should_panic(expected = "is not a node of this graph")]
fn test_level_of_step_from_other_workflow_panics() {
    event_workflow().level_of(&Fragmenter);
}
