//! Cross-component behavior of the simulation core

use nbody_core::glam::DVec3;
use nbody_core::spawn::{self, SampledGroup};
use nbody_core::{ParticleStore, Simulation, SpawnSpec, StoreError};

fn point_mass(center: DVec3, seed: u64) -> SpawnSpec {
    SpawnSpec {
        number_of_particles: 1,
        center,
        radius: 0.0,
        turbulence_strength: 0.0,
        angular_velocity: 0.0,
        seed,
        ..SpawnSpec::default()
    }
}

fn cloud(n: usize, seed: u64) -> SpawnSpec {
    SpawnSpec {
        number_of_particles: n,
        radius: 10.0,
        turbulence_strength: 0.05,
        seed,
        ..SpawnSpec::default()
    }
}

#[test]
fn two_equal_masses_keep_their_center_of_mass() {
    let mut sim = Simulation::new();
    // Same seed -> same mass draw.
    sim.add_group(point_mass(DVec3::new(-1.0, 0.5, 0.0), 42)).unwrap();
    sim.add_group(point_mass(DVec3::new(1.0, -0.5, 2.0), 42)).unwrap();

    let masses = sim.store().masses().to_vec();
    assert_eq!(masses[0], masses[1]);

    let initial = sim.center_of_mass();
    let mut moved = false;
    for _ in 0..500 {
        let frame = sim.tick();
        moved |= frame.positions[0] != DVec3::new(-1.0, 0.5, 0.0);
        let com = sim.center_of_mass();
        assert!(
            (com - initial).length() < 1e-9,
            "center of mass drifted to {com:?}"
        );
    }
    assert!(moved, "bodies never moved");
}

#[test]
fn bodies_fall_toward_each_other() {
    let mut sim = Simulation::new();
    sim.add_group(point_mass(DVec3::new(-1.0, 0.0, 0.0), 7)).unwrap();
    sim.add_group(point_mass(DVec3::new(1.0, 0.0, 0.0), 7)).unwrap();

    for _ in 0..10 {
        sim.tick();
    }
    let positions = sim.store().positions();
    assert!(positions[0].x > -1.0);
    assert!(positions[1].x < 1.0);
    assert!(sim.store().velocities()[0].x > 0.0);
}

#[test]
fn sampling_ignores_what_was_spawned_before() {
    let alone = spawn::sample(&cloud(40, 11));

    let mut sim = Simulation::new();
    sim.add_group(cloud(25, 3)).unwrap();
    let handle = sim.add_group(cloud(40, 11)).unwrap();
    let range = sim.group(handle).unwrap().range();

    assert_eq!(&sim.store().positions()[range.clone()], alone.positions.as_slice());
    assert_eq!(&sim.store().velocities()[range.clone()], alone.velocities.as_slice());
    assert_eq!(&sim.store().masses()[range], alone.masses.as_slice());
}

#[test]
fn append_keeps_existing_particles_in_place() {
    let mut sim = Simulation::new();
    sim.add_group(cloud(30, 1)).unwrap();
    for _ in 0..3 {
        sim.tick();
    }
    let positions = sim.store().positions().to_vec();
    let velocities = sim.store().velocities().to_vec();
    let masses = sim.store().masses().to_vec();

    let extra = spawn::sample(&cloud(12, 2));
    sim.add_group(cloud(12, 2)).unwrap();

    let store = sim.store();
    assert_eq!(store.len(), 42);
    assert_eq!(&store.positions()[..30], positions.as_slice());
    assert_eq!(&store.velocities()[..30], velocities.as_slice());
    assert_eq!(&store.masses()[..30], masses.as_slice());
    assert_eq!(&store.positions()[30..], extra.positions.as_slice());
}

#[test]
fn removing_a_fresh_group_restores_the_store() {
    let mut sim = Simulation::new();
    sim.add_group(cloud(20, 5)).unwrap();
    sim.tick();
    let positions = sim.store().positions().to_vec();
    let next_positions = sim.store().next_positions().to_vec();
    let velocities = sim.store().velocities().to_vec();
    let masses = sim.store().masses().to_vec();

    let handle = sim.add_group(cloud(9, 6)).unwrap();
    sim.remove_group(handle).unwrap();

    let store = sim.store();
    assert_eq!(store.len(), 20);
    assert_eq!(store.positions(), positions.as_slice());
    assert_eq!(store.next_positions(), next_positions.as_slice());
    assert_eq!(store.velocities(), velocities.as_slice());
    assert_eq!(store.masses(), masses.as_slice());
}

#[test]
fn removing_first_group_shifts_the_rest_with_their_particles() {
    let specs = [cloud(3, 1), cloud(5, 2), cloud(2, 3)];
    let mut sim = Simulation::new();
    let handles = sim.add_groups(specs.clone()).unwrap();

    sim.remove_group(handles[0]).unwrap();

    let second = sim.group(handles[1]).unwrap();
    let third = sim.group(handles[2]).unwrap();
    assert_eq!((second.start(), second.count()), (0, 5));
    assert_eq!((third.start(), third.count()), (5, 2));

    let masses = sim.store().masses();
    assert_eq!(&masses[second.range()], spawn::sample(&specs[1]).masses.as_slice());
    assert_eq!(&masses[third.range()], spawn::sample(&specs[2]).masses.as_slice());
    assert_eq!(sim.particle_count(), 7);
}

#[test]
fn groups_partition_the_store_after_churn() {
    let mut sim = Simulation::new();
    let mut live = sim
        .add_groups((0..6).map(|i| cloud(2 + i * 3, i as u64)))
        .unwrap();

    for (step, victim) in [4usize, 0, 1, 2].into_iter().enumerate() {
        sim.remove_group(live.remove(victim)).unwrap();
        sim.tick();
        live.push(sim.add_group(cloud(step + 1, 100 + step as u64)).unwrap());

        let mut next_start = 0;
        for group in sim.groups() {
            assert_eq!(group.start(), next_start);
            next_start = group.end();
        }
        assert_eq!(next_start, sim.particle_count());
    }

    let order: Vec<_> = sim.groups().map(|g| g.handle()).collect();
    assert_eq!(order, live);
}

#[test]
fn boundary_removals_leave_buffers_unchanged() {
    let mut store = ParticleStore::new();
    store.append(&spawn::sample(&cloud(6, 9))).unwrap();
    let before: SampledGroup = SampledGroup {
        positions: store.positions().to_vec(),
        velocities: store.velocities().to_vec(),
        masses: store.masses().to_vec(),
    };
    let n = store.len();

    assert_eq!(
        store.remove_range(n - 1, 2),
        Err(StoreError::RangeOutOfBounds {
            start: n - 1,
            count: 2,
            len: n
        })
    );
    // The closest usize analogue of a negative start.
    assert!(store.remove_range(usize::MAX, 1).is_err());
    assert!(store.remove_range(n + 1, 0).is_err());

    assert_eq!(store.positions(), before.positions.as_slice());
    assert_eq!(store.velocities(), before.velocities.as_slice());
    assert_eq!(store.masses(), before.masses.as_slice());
}

#[test]
fn coincident_spawn_stays_finite() {
    let mut sim = Simulation::new();
    sim.add_group(point_mass(DVec3::splat(3.0), 1)).unwrap();
    sim.add_group(point_mass(DVec3::splat(3.0), 2)).unwrap();

    for _ in 0..5 {
        let frame = sim.tick();
        assert!(frame.positions.iter().all(|p| p.is_finite()));
    }
    assert!(sim.store().velocities().iter().all(|v| v.is_finite()));
}
