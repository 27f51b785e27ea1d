mod common;

use common::{test_config, Call, FakeMotion, ScriptedGripper, Sensed};
use rescue_io::{FloorColor, ZoneColor};
use rescue_nav::mission::{classify, DeliveryOutcome, Destination};
use rescue_nav::motion::{AlignOutcome, PersonMeasurement};
use rescue_nav::{Cell, Mission, Position, Side};
use std::collections::HashSet;

type FakeMission = Mission<FakeMotion, ScriptedGripper>;

fn mission(motion: FakeMotion, gripper: ScriptedGripper) -> FakeMission {
    Mission::new(motion, gripper, &test_config())
}

fn motion_of(mission: &FakeMission) -> &FakeMotion {
    mission.navigator().motion()
}

fn drove(mission: &FakeMission, mm: f32) -> bool {
    motion_of(mission)
        .calls
        .iter()
        .any(|c| matches!(c, Call::Drive(r) if r.distance == Some(mm)))
}

fn cells(points: &[(i32, i32)]) -> Vec<Cell> {
    points.iter().map(|&(x, y)| Cell::new(x, y)).collect()
}

// Delivery

#[test]
fn test_deliver_to_school() {
    let motion = FakeMotion::at(Position::origin()).script(&[Sensed::both(FloorColor::Red)]);
    let mut mission = mission(motion, ScriptedGripper::default());

    let outcome = mission.deliver_person(Destination::School).unwrap();
    assert_eq!(
        outcome,
        DeliveryOutcome::Delivered {
            entrance: Position::new(1, 1, Side::Right)
        }
    );
    assert_eq!(mission.deliveries().count(Destination::School), 1);
    assert_eq!(mission.gripper().opens, 1);

    // First delivery there: back in 300mm, come out 260mm
    assert!(drove(&mission, -300.0));
    assert!(drove(&mission, 260.0));
    assert!(motion_of(&mission).calls.contains(&Call::Align(vec![
        FloorColor::Blue,
        FloorColor::Black,
        FloorColor::Yellow
    ])));

    // Home approach in front of the blue zone, then squared up on red
    assert_eq!(motion_of(&mission).route, cells(&[(1, 0), (1, 1), (1, 0)]));
    assert!(motion_of(&mission).sensed.is_empty());
    assert!(motion_of(&mission)
        .calls
        .contains(&Call::ResetHeading(Side::Left.degrees())));
    assert_eq!(
        motion_of(&mission).calls.last(),
        Some(&Call::SetPosition(Position::origin()))
    );
    assert_eq!(mission.position(), Position::origin());
}

#[test]
fn test_red_realignment_pins_origin() {
    let motion = FakeMotion::at(Position::origin()).script(&[Sensed::both(FloorColor::Red)]);
    let mut mission = mission(motion, ScriptedGripper::default());

    mission.deliver_person(Destination::School).unwrap();
    assert_eq!(mission.position(), Position::origin());

    // The next trip plans from the corner, not from the blue zone
    let outcome = mission.deliver_person(Destination::School).unwrap();
    assert_eq!(
        outcome,
        DeliveryOutcome::Delivered {
            entrance: Position::new(1, 1, Side::Right)
        }
    );
    assert_eq!(
        motion_of(&mission).count(|c| *c == Call::Squares(-1, Side::Left)),
        2
    );
}

#[test]
fn test_repeat_delivery_uses_shorter_clearance() {
    let motion = FakeMotion::at(Position::origin()).script(&[Sensed::both(FloorColor::Red)]);
    let mut mission = mission(motion, ScriptedGripper::default());

    mission.deliver_person(Destination::School).unwrap();
    // Two deliveries done: no red realignment, so no scripted stop is needed
    let outcome = mission.deliver_person(Destination::School).unwrap();

    assert!(matches!(outcome, DeliveryOutcome::Delivered { .. }));
    assert_eq!(mission.deliveries().count(Destination::School), 2);
    assert_eq!(mission.deliveries().total(), 2);
    assert!(drove(&mission, -250.0));
    assert!(drove(&mission, 210.0));
    assert_eq!(
        motion_of(&mission).calls.last(),
        Some(&Call::TurnToSide(Side::Left))
    );
    // Backed off the blue zone and turned, without the red realignment
    assert_eq!(mission.position(), Position::new(1, 0, Side::Left));
}

#[test]
fn test_delivery_falls_back_to_second_entrance() {
    let motion = FakeMotion::at(Position::origin())
        .with_hidden(&[Cell::new(1, 1)])
        .script(&[Sensed::both(FloorColor::Red)]);
    let mut mission = mission(motion, ScriptedGripper::default());

    let outcome = mission.deliver_person(Destination::School).unwrap();
    assert_eq!(
        outcome,
        DeliveryOutcome::Delivered {
            entrance: Position::new(0, 2, Side::Back)
        }
    );
    assert!(mission.navigator().obstacles().contains(Cell::new(1, 1)));
    assert!(!motion_of(&mission).route.contains(&Cell::new(1, 1)));
    assert_eq!(mission.deliveries().count(Destination::School), 1);
}

#[test]
fn test_unreachable_place_keeps_person() {
    let mut mission = mission(
        FakeMotion::at(Position::origin()),
        ScriptedGripper::default(),
    );
    mission.navigator_mut().add_obstacle(Cell::new(1, 1));
    mission.navigator_mut().add_obstacle(Cell::new(0, 2));

    let outcome = mission.deliver_person(Destination::School).unwrap();
    assert_eq!(outcome, DeliveryOutcome::Unreachable);
    assert_eq!(mission.gripper().opens, 0);
    assert_eq!(mission.deliveries().total(), 0);
}

#[test]
fn test_blocked_way_home_strands_at_entrance() {
    let mut mission = mission(
        FakeMotion::at(Position::new(3, 2, Side::Left)),
        ScriptedGripper::default(),
    );
    mission.navigator_mut().add_obstacle(Cell::new(1, 0));

    let outcome = mission.deliver_person(Destination::School).unwrap();
    let entrance = Position::new(1, 1, Side::Right);
    assert_eq!(outcome, DeliveryOutcome::Stranded { entrance });
    assert_eq!(mission.deliveries().count(Destination::School), 1);
    assert_eq!(mission.gripper().opens, 1);

    // No blue alignment from a cell that is not in front of the blue zone
    assert!(!motion_of(&mission)
        .calls
        .contains(&Call::Align(vec![FloorColor::Blue])));
    assert_eq!(mission.position(), entrance);
}

#[test]
fn test_park_uses_park_clearance() {
    // (0,4) FRONT is the first park entrance
    let motion = FakeMotion::at(Position::origin()).script(&[Sensed::both(FloorColor::Red)]);
    let mut mission = mission(motion, ScriptedGripper::default());

    let outcome = mission.deliver_person(Destination::Park).unwrap();
    assert!(matches!(outcome, DeliveryOutcome::Delivered { .. }));
    assert!(drove(&mission, -175.0));
    assert_eq!(mission.deliveries().count(Destination::Park), 1);
}

// Pickup

#[test]
fn test_pickup_child_for_school() {
    let motion = FakeMotion::at(Position::origin())
        .script(&[Sensed::person(), Sensed::both(FloorColor::Red)]);
    let mut mission = mission(motion, ScriptedGripper::new(&[true], ZoneColor::Blue));

    let place = mission.take_person().unwrap();
    assert_eq!(place, Some(Destination::School));
    assert_eq!(mission.position(), Position::origin());
    assert_eq!(mission.gripper().opens, 0);
    assert_eq!(mission.gripper().holds, 1);
    // Docking distance is the measured 60mm plus margin
    assert!(drove(&mission, -80.0));
}

#[test]
fn test_pickup_adult_for_drugstore() {
    let mut motion = FakeMotion::at(Position::origin())
        .script(&[Sensed::person(), Sensed::both(FloorColor::Red)]);
    motion.measurements.push_back(PersonMeasurement {
        distance_mm: 45.0,
        is_adult: true,
    });
    let mut mission = mission(motion, ScriptedGripper::new(&[true], ZoneColor::Red));

    assert_eq!(mission.take_person().unwrap(), Some(Destination::Drugstore));
}

#[test]
fn test_failed_grasp_is_retried() {
    let motion = FakeMotion::at(Position::origin()).script(&[
        Sensed::person(),
        Sensed::both(FloorColor::Red),
        Sensed::person(),
        Sensed::both(FloorColor::Red),
    ]);
    let mut mission = mission(
        motion,
        ScriptedGripper::new(&[false, true], ZoneColor::Blue),
    );

    let place = mission.take_person_retrying(3).unwrap();
    assert_eq!(place, Some(Destination::School));
    assert_eq!(mission.gripper().grab_calls, 2);
    assert_eq!(mission.gripper().opens, 1);
    // Only the successful grasp is held
    assert_eq!(mission.gripper().holds, 1);
    assert_eq!(motion_of(&mission).count(|c| *c == Call::Measure), 2);
    assert_eq!(mission.position(), Position::origin());
    assert!(motion_of(&mission).sensed.is_empty());
}

#[test]
fn test_unclassifiable_person_is_released() {
    let motion = FakeMotion::at(Position::origin())
        .script(&[Sensed::person(), Sensed::both(FloorColor::Red)]);
    let mut mission = mission(motion, ScriptedGripper::new(&[true], ZoneColor::Red));

    assert_eq!(mission.take_person().unwrap(), None);
    assert_eq!(mission.gripper().opens, 1);
    assert_eq!(mission.position(), Position::origin());
}

#[test]
fn test_search_reverses_past_junction_stripe() {
    let motion = FakeMotion::at(Position::origin()).script(&[
        Sensed::both(FloorColor::Black),
        Sensed::person(),
        Sensed::both(FloorColor::Red),
    ]);
    let mut mission = mission(motion, ScriptedGripper::new(&[true], ZoneColor::Green));

    assert_eq!(mission.take_person().unwrap(), Some(Destination::Park));
    let clearance = test_config().mission.junction_clearance_mm;
    assert!(motion_of(&mission).calls.iter().any(|c| matches!(
        c,
        Call::Drive(r) if r.distance == Some(-clearance) && r.direction == Some(Side::Left)
    )));
}

#[test]
fn test_search_turns_back_at_red_end() {
    let motion = FakeMotion::at(Position::origin()).script(&[
        Sensed::both(FloorColor::Red),
        Sensed::both(FloorColor::Black),
        Sensed::person(),
        Sensed::both(FloorColor::Red),
    ]);
    let mut mission = mission(motion, ScriptedGripper::new(&[true], ZoneColor::Brown));

    assert_eq!(mission.take_person().unwrap(), Some(Destination::Library));
    assert!(drove(&mission, 300.0));
}

#[test]
fn test_classification_covers_every_destination_once() {
    let zones = [
        ZoneColor::Red,
        ZoneColor::Blue,
        ZoneColor::Brown,
        ZoneColor::Green,
        ZoneColor::None,
    ];
    let mut places = HashSet::new();
    let mut rejected = Vec::new();
    for is_adult in [true, false] {
        for zone in zones {
            match classify(is_adult, zone) {
                Some(place) => assert!(places.insert(place), "{} twice", place),
                None => rejected.push((is_adult, zone)),
            }
        }
    }
    assert_eq!(places.len(), Destination::ALL.len());
    assert_eq!(
        rejected,
        vec![
            (true, ZoneColor::None),
            (false, ZoneColor::Red),
            (false, ZoneColor::None)
        ]
    );
}

// Reference corner

fn corner_mission(sensed: &[Sensed], aligns: &[AlignOutcome]) -> FakeMission {
    // Unknown pose until the corner is found
    let mut motion = FakeMotion::at(Position::new(2, 2, Side::Front)).script(sensed);
    motion.aligns.extend(aligns.iter().copied());
    mission(motion, ScriptedGripper::default())
}

fn assert_at_origin(mission: &FakeMission) {
    let motion = motion_of(mission);
    assert_eq!(mission.position(), Position::origin());
    assert!(motion.sensed.is_empty(), "unused script: {:?}", motion.sensed);
    assert_eq!(motion.calls.last(), Some(&Call::SetPosition(Position::origin())));
}

#[test]
fn test_corner_straight_onto_blue() {
    let mut mission = corner_mission(
        &[Sensed::both(FloorColor::Blue), Sensed::both(FloorColor::Red)],
        &[],
    );
    mission.find_reference_corner().unwrap();

    assert_at_origin(&mission);
    let motion = motion_of(&mission);
    assert!(motion.calls.contains(&Call::ResetHeading(Side::Front.degrees())));
    assert!(motion.calls.contains(&Call::ResetHeading(Side::Left.degrees())));
}

#[test]
fn test_corner_turns_away_from_junction_and_obstacle() {
    let mut mission = corner_mission(
        &[
            Sensed::floor(FloorColor::White, FloorColor::Yellow),
            Sensed::obstacle(),
            Sensed::both(FloorColor::Blue),
            Sensed::both(FloorColor::Red),
        ],
        &[],
    );
    mission.find_reference_corner().unwrap();

    assert_at_origin(&mission);
    assert_eq!(
        motion_of(&mission).count(|c| *c == Call::TurnAngle(90.0)),
        2
    );
}

#[test]
fn test_corner_blue_behind_red() {
    let mut mission = corner_mission(
        &[
            Sensed::both(FloorColor::Red),
            Sensed::floor(FloorColor::Blue, FloorColor::White),
            Sensed::both(FloorColor::Red),
        ],
        &[],
    );
    mission.find_reference_corner().unwrap();
    assert_at_origin(&mission);
}

#[test]
fn test_corner_via_east_side() {
    let mut mission = corner_mission(
        &[
            Sensed::both(FloorColor::Red),
            Sensed::both(FloorColor::Black),
            Sensed::both(FloorColor::White),
            Sensed::both(FloorColor::Blue),
            Sensed::both(FloorColor::Red),
        ],
        &[],
    );
    mission.find_reference_corner().unwrap();

    assert_at_origin(&mission);
    let motion = motion_of(&mission);
    assert!(motion
        .calls
        .contains(&Call::SetPosition(Position::new(4, 2, Side::Left))));
    assert_eq!(motion.route, cells(&[(3, 2), (3, 0)]));
}

#[test]
fn test_corner_obstacle_at_top_is_recorded() {
    let mut mission = corner_mission(
        &[
            Sensed::both(FloorColor::Red),
            Sensed::both(FloorColor::Black),
            Sensed::both(FloorColor::White),
            Sensed::obstacle(),
            Sensed::both(FloorColor::Red),
            Sensed::both(FloorColor::Red),
        ],
        &[],
    );
    mission.find_reference_corner().unwrap();

    assert_at_origin(&mission);
    assert!(mission.navigator().obstacles().contains(Cell::new(3, 1)));
    assert_eq!(
        motion_of(&mission).route,
        cells(&[(3, 2), (3, 0), (1, 2), (1, 0)])
    );
}

#[test]
fn test_corner_far_corner_on_double_yellow() {
    let yellow = AlignOutcome {
        saw_yellow: true,
        aborted: false,
    };
    let mut mission = corner_mission(
        &[
            Sensed::both(FloorColor::Red),
            Sensed::both(FloorColor::Black),
            Sensed::both(FloorColor::White),
            Sensed::both(FloorColor::Red),
            Sensed::both(FloorColor::Red),
        ],
        &[AlignOutcome::default(), yellow, yellow],
    );
    mission.find_reference_corner().unwrap();

    assert_at_origin(&mission);
    let motion = motion_of(&mission);
    assert!(motion
        .calls
        .contains(&Call::SetPosition(Position::new(0, 4, Side::Back))));
    assert!(motion.calls.contains(&Call::ResetHeading(Side::Back.degrees())));
    assert_eq!(motion.route, cells(&[(1, 4), (1, 2), (1, 0)]));
}
