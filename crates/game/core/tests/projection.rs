use effect_core::dice::Aspect;
use effect_core::project::{
    ProjectFlags, Projection, ProjectionKind, ProjectionTable, Resistance, adjust_dam, blast_area,
    damage_at_distance, distance, project_path,
};
use effect_core::state::{Cave, Position, Source};
use effect_core::{EngineConfig, GameState};

fn open_state(width: u32, height: u32, player: Position) -> GameState {
    GameState::new(Cave::new(width, height), player, 17)
}

#[test]
fn paths_respect_range_and_skip_the_start() {
    let cave = Cave::new(40, 40);
    let start = Position::new(3, 3);
    let ends = [
        Position::new(36, 3),
        Position::new(36, 36),
        Position::new(10, 30),
        Position::new(4, 3),
    ];
    for end in ends {
        for range in [1, 5, 20] {
            let path = project_path(&cave, range, start, end, ProjectFlags::empty());
            assert!(path.len() as i32 <= range, "{end} at range {range}");
            assert!(!path.contains(&start));
            if let Some(first) = path.first() {
                assert_eq!(distance(start, *first), 1);
            }
        }
    }
    assert!(project_path(&cave, 20, start, start, ProjectFlags::THRU).is_empty());
}

#[test]
fn paths_end_at_the_target_unless_passing_through() {
    let cave = Cave::new(40, 20);
    let start = Position::new(2, 10);
    let end = Position::new(8, 10);
    let short = project_path(&cave, 20, start, end, ProjectFlags::empty());
    assert_eq!(short.last(), Some(&end));

    let long = project_path(&cave, 20, start, end, ProjectFlags::THRU);
    assert!(long.len() > short.len());
    assert!(long.contains(&end));
}

#[test]
fn damage_never_grows_with_distance() {
    for dam in [1, 7, 50, 333] {
        for diameter in [0, 4, 12, 20, 25] {
            let at: Vec<i32> = (0..=10)
                .map(|d| damage_at_distance(dam, 10, diameter, d))
                .collect();
            assert!(
                at.windows(2).all(|w| w[0] >= w[1]),
                "dam {dam} diameter {diameter}: {at:?}"
            );
            assert_eq!(at[0], dam);
        }
        assert_eq!(damage_at_distance(dam, 3, 0, 4), 0);
    }
}

#[test]
fn bolts_hit_the_last_grid_and_beams_every_grid() {
    let config = EngineConfig::default();
    let player = Position::new(2, 2);
    let target = Position::new(12, 7);
    let mut state = open_state(30, 20, player);
    let path = project_path(&state.cave, config.projection_range(), player, target, ProjectFlags::empty());

    let bolt = Projection::new(Source::Player, target, ProjectionKind::Missile, 10);
    let blast = blast_area(&mut state, &config, &bolt);
    let grids: Vec<Position> = blast.grids.iter().map(|entry| entry.grid).collect();
    assert_eq!(grids, vec![*path.last().unwrap()]);

    let beam = bolt.with_flags(ProjectFlags::BEAM);
    let blast = blast_area(&mut state, &config, &beam);
    let grids: Vec<Position> = blast.grids.iter().map(|entry| entry.grid).collect();
    assert_eq!(grids, path.to_vec());
}

#[test]
fn ball_grids_stay_within_the_radius() {
    let config = EngineConfig::default();
    let mut state = open_state(40, 40, Position::new(3, 3));
    let centre = Position::new(20, 20);
    let ball = Projection::new(Source::None, centre, ProjectionKind::Acid, 30).with_radius(3);
    let blast = blast_area(&mut state, &config, &ball);
    assert!(blast.grids.iter().all(|entry| entry.distance <= 3));
    assert!(
        blast
            .grids
            .iter()
            .all(|entry| distance(centre, entry.grid) == entry.distance)
    );
    assert_eq!(blast.damage_at(0), 30);
    assert_eq!(blast.damage_at(3), (30 + 3) / 4);
}

#[test]
fn blast_areas_are_capped() {
    let config = EngineConfig::default();
    let mut state = open_state(64, 64, Position::new(1, 1));
    let ball = Projection::new(Source::None, Position::new(32, 32), ProjectionKind::Mana, 300)
        .with_radius(20);
    let blast = blast_area(&mut state, &config, &ball);
    assert_eq!(blast.grids.len(), 256);
}

#[test]
fn arcs_only_cover_their_cone() {
    let config = EngineConfig::default();
    let source = Position::new(5, 20);
    let mut state = open_state(40, 40, source);
    let breath = Projection::new(Source::Player, Position::new(30, 20), ProjectionKind::Fire, 60)
        .with_radius(12)
        .with_flags(ProjectFlags::ARC)
        .with_arc(40, 20);
    let blast = blast_area(&mut state, &config, &breath);
    assert!(!blast.grids.is_empty());
    for entry in &blast.grids {
        let (dx, dy) = (entry.grid.x - source.x, (entry.grid.y - source.y).abs());
        assert!(dx >= 0, "{} lies behind the breather", entry.grid);
        assert!(dy <= dx, "{} lies outside the cone", entry.grid);
    }
}

#[test]
fn immunity_and_vulnerability() {
    let table = ProjectionTable::standard();
    let mut state = open_state(8, 8, Position::new(3, 3));
    for raw in [0, 9, 100, 600] {
        let immune = adjust_dam(
            &mut state,
            &table,
            ProjectionKind::Elec,
            raw,
            Aspect::Randomise,
            Resistance::Level(3),
        );
        assert_eq!(immune, 0);
        let vulnerable = adjust_dam(
            &mut state,
            &table,
            ProjectionKind::Elec,
            raw,
            Aspect::Randomise,
            Resistance::Level(-1),
        );
        assert_eq!(vulnerable, raw * 4 / 3);
    }
}
