use criterion::{Criterion, black_box, criterion_group, criterion_main};
use junctionforge_core::boundary::{BoundaryAssembler, BoundaryKind};
use junctionforge_core::loading::{LaneLayout, RadialJunctionTemplate};
use junctionforge_core::{JunctionConfig, rebuild_junction};

fn eight_arm_template() -> RadialJunctionTemplate {
    let angles: Vec<f64> = (0..8).map(|i| f64::from(i) * 45.0).collect();
    RadialJunctionTemplate::new(&angles).with_layout(LaneLayout {
        driving_per_side: 3,
        lane_width: 3.25,
        sidewalk_width: Some(2.0),
    })
}

fn bench_rebuild(c: &mut Criterion) {
    let config = JunctionConfig::default();
    let (network, geometry, junction_id) = eight_arm_template().build().expect("template");

    c.bench_function("rebuild_junction_8_arms", |b| {
        b.iter(|| {
            let mut network = network.clone();
            let mut geometry = geometry.clone();
            rebuild_junction(&mut network, &mut geometry, junction_id, &config).expect("rebuild");
            black_box(network.road_count());
        });
    });
}

fn bench_boundary(c: &mut Criterion) {
    let config = JunctionConfig::default();
    let (mut network, mut geometry, junction_id) = eight_arm_template().build().expect("template");
    rebuild_junction(&mut network, &mut geometry, junction_id, &config).expect("rebuild");

    c.bench_function("assemble_boundary_8_arms", |b| {
        b.iter(|| {
            let boundary = BoundaryAssembler::new(&geometry, config, BoundaryKind::Outer)
                .assemble(black_box(&network), junction_id)
                .expect("boundary");
            black_box(boundary.to_polygon(&network, &geometry, &config));
        });
    });
}

criterion_group!(benches, bench_rebuild, bench_boundary);
criterion_main!(benches);
