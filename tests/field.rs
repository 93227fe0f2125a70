use escape_field::{
    evaluate, AlignedBuffer, Config, Error, Evaluator, LaneWidth, Resolution, Window,
};

const ALL_WIDTHS: [LaneWidth; 5] = [
    LaneWidth::Scalar,
    LaneWidth::X4,
    LaneWidth::X8,
    LaneWidth::X16,
    LaneWidth::Native,
];

fn full_view() -> Window {
    Window::new(-2.0, 1.0, -1.5, 1.5)
}

fn evaluate_with(
    config: Config,
    window: Window,
    resolution: Resolution,
    parallel: bool,
) -> AlignedBuffer<f32> {
    Evaluator::new(config)
        .unwrap()
        .evaluate(window, resolution, parallel)
        .unwrap()
}

fn at(field: &[f32], resolution: Resolution, px: usize, py: usize) -> f32 {
    field[py * resolution.re_size + px]
}

#[test_log::test]
fn reference_scenario() {
    let resolution = Resolution::new(64, 64);
    let config = Config::default().with_max_iterations(100);
    let field = evaluate_with(config, full_view(), resolution, false);

    assert_eq!(field.len(), 4096);
    assert!(field.iter().all(|value| (0.0..=1.0).contains(value)));

    // Row 32 is the real axis; column 32 is re = -0.5.
    assert_eq!(full_view().point(resolution, 32, 32).re, -0.5);
    assert_eq!(at(&field, resolution, 32, 32), 1.0);

    // The last column, re ≈ 0.95, is the closest sample to re = 1.0.
    assert!(at(&field, resolution, 63, 32) < 0.3);
}

#[test_log::test]
fn parallel_matches_sequential() {
    let resolution = Resolution::new(128, 96);
    let window = Window::new(-0.75, -0.7, 0.1, 0.15);

    for lane_width in ALL_WIDTHS {
        let config = Config::default()
            .with_max_iterations(500)
            .with_lane_width(lane_width);

        let sequential = evaluate_with(config.clone(), window, resolution, false);
        let global_pool = evaluate_with(config.clone(), window, resolution, true);
        let own_pool = evaluate_with(config.with_threads(3), window, resolution, true);

        assert_eq!(&sequential[..], &global_pool[..], "{:?}", lane_width);
        assert_eq!(&sequential[..], &own_pool[..], "{:?}", lane_width);
    }
}

#[test_log::test]
fn values_stay_in_unit_range() {
    let resolution = Resolution::new(96, 80);
    for lane_width in ALL_WIDTHS {
        let config = Config::default().with_lane_width(lane_width);
        let window = Window::new(-2.5, 1.5, -2.0, 2.0);
        let field = evaluate_with(config, window, resolution, true);
        assert!(
            field.iter().all(|value| (0.0..=1.0).contains(value)),
            "{:?}",
            lane_width
        );
    }
}

#[test_log::test]
fn origin_never_escapes() {
    let resolution = Resolution::new(64, 64);
    let window = Window::new(-2.0, 2.0, -2.0, 2.0);
    assert_eq!(window.point(resolution, 32, 32).re, 0.0);
    assert_eq!(window.point(resolution, 32, 32).im, 0.0);

    for lane_width in ALL_WIDTHS {
        for max_iterations in [1, 7, 100, 1000] {
            let config = Config::default()
                .with_lane_width(lane_width)
                .with_max_iterations(max_iterations);
            let field = evaluate_with(config, window, resolution, false);
            assert_eq!(at(&field, resolution, 32, 32), 1.0);
        }
    }
}

#[test_log::test]
fn far_point_escapes_immediately() {
    // Pixel (0, 0) samples 2 + 2i; everything else lies further out.
    let resolution = Resolution::new(16, 4);
    let window = Window::new(2.0, 3.0, 2.0, 3.0);
    let max_iterations = 100;
    let config = Config::default().with_max_iterations(max_iterations);
    let field = evaluate_with(config, window, resolution, false);

    let limit = 1.0 / max_iterations as f32;
    assert!(at(&field, resolution, 0, 0) <= limit);
    assert!(field.iter().all(|value| *value <= limit));
}

#[test_log::test]
fn conjugate_rows_match() {
    // Samples sit at im_min + py * im_step, so row py mirrors row im_size - py.
    let resolution = Resolution::new(64, 64);
    for lane_width in ALL_WIDTHS {
        let config = Config::default()
            .with_max_iterations(200)
            .with_lane_width(lane_width);
        let field = evaluate_with(config, full_view(), resolution, true);

        for py in 1..resolution.im_size {
            let mirror = resolution.im_size - py;
            let row = &field[py * 64..(py + 1) * 64];
            let mirrored = &field[mirror * 64..(mirror + 1) * 64];
            assert_eq!(row, mirrored, "rows {} and {}", py, mirror);
        }
    }
}

#[test_log::test]
fn refinement_preserves_classification() {
    let coarse_resolution = Resolution::new(64, 64);
    let fine_resolution = Resolution::new(128, 128);
    let config = Config::default().with_max_iterations(200);

    let coarse = evaluate_with(config.clone(), full_view(), coarse_resolution, true);
    let fine = evaluate_with(config, full_view(), fine_resolution, true);

    let mut disagreements = 0;
    for py in 0..coarse_resolution.im_size {
        for px in 0..coarse_resolution.re_size {
            let inside_coarse = at(&coarse, coarse_resolution, px, py) == 1.0;
            let inside_fine = at(&fine, fine_resolution, 2 * px, 2 * py) == 1.0;
            if inside_coarse != inside_fine {
                disagreements += 1;
            }
        }
    }
    assert!(
        disagreements * 100 <= coarse.len(),
        "{} of {} samples changed class",
        disagreements,
        coarse.len()
    );
}

#[test_log::test]
fn lane_widths_agree_on_classification() {
    // A step of 3/160 isn't exact in binary, so each width accumulates
    // slightly different column coordinates and boundary points may flip.
    let resolution = Resolution::new(160, 64);
    let window = Window::new(-2.1, 0.9, -1.2, 1.2);
    let config = Config::default().with_max_iterations(150);

    let scalar = evaluate_with(
        config.clone().with_lane_width(LaneWidth::Scalar),
        window,
        resolution,
        true,
    );
    for lane_width in ALL_WIDTHS {
        let field = evaluate_with(
            config.clone().with_lane_width(lane_width),
            window,
            resolution,
            true,
        );
        let disagreements = scalar
            .iter()
            .zip(field.iter())
            .filter(|(a, b)| (**a == 1.0) != (**b == 1.0))
            .count();
        assert!(
            disagreements * 100 <= field.len() * 3,
            "{:?}: {} disagreements",
            lane_width,
            disagreements
        );
    }
}

#[test_log::test]
fn output_is_lane_aligned() {
    for lane_width in ALL_WIDTHS {
        let config = Config::default().with_lane_width(lane_width);
        let field = evaluate_with(config, full_view(), Resolution::new(32, 8), false);
        let group_bytes = lane_width.lanes() * std::mem::size_of::<f32>();

        assert!(field.alignment() >= 32);
        assert_eq!(field.alignment() % group_bytes, 0);
        assert_eq!(field.as_ptr() as usize % field.alignment(), 0);
        assert_eq!(field.as_bytes().len(), 32 * 8 * 4);
    }
}

#[test_log::test]
fn single_iteration_budget_is_binary() {
    let config = Config::default().with_max_iterations(1);
    let field = evaluate_with(config, full_view(), Resolution::new(64, 16), false);
    assert!(field.iter().all(|value| *value == 0.0 || *value == 1.0));
    assert!(field.iter().any(|value| *value == 0.0));
    assert!(field.iter().any(|value| *value == 1.0));
}

#[test_log::test]
fn default_evaluate_entry_point() {
    let resolution = Resolution::new(64, 64);
    let field = evaluate(full_view(), resolution, true).unwrap();
    let reference = evaluate_with(Config::default(), full_view(), resolution, false);
    assert_eq!(&field[..], &reference[..]);

    let values = field.into_vec();
    assert_eq!(values.len(), 64 * 64);
}

#[test_log::test]
fn rejects_invalid_geometry() {
    let resolution = Resolution::new(64, 64);
    let invalid = |result: escape_field::Result<AlignedBuffer<f32>>| {
        matches!(result, Err(Error::InvalidArgument(_)))
    };

    assert!(invalid(evaluate(Window::new(1.0, -2.0, -1.5, 1.5), resolution, false)));
    assert!(invalid(evaluate(Window::new(-2.0, 1.0, 1.5, 1.5), resolution, false)));
    assert!(invalid(evaluate(Window::new(-2.0, f32::NAN, -1.5, 1.5), resolution, false)));
    assert!(invalid(evaluate(full_view(), Resolution::new(0, 64), false)));
    assert!(invalid(evaluate(full_view(), Resolution::new(64, 0), true)));

    let x8 = Evaluator::new(Config::default().with_lane_width(LaneWidth::X8)).unwrap();
    assert!(invalid(x8.evaluate(full_view(), Resolution::new(12, 4), false)));
    assert!(x8.evaluate(full_view(), Resolution::new(16, 4), false).is_ok());

    // A ragged width is fine one pixel at a time.
    let scalar = Evaluator::new(Config::default().with_lane_width(LaneWidth::Scalar)).unwrap();
    assert_eq!(
        scalar
            .evaluate(full_view(), Resolution::new(13, 3), true)
            .unwrap()
            .len(),
        39
    );
}

#[test_log::test]
fn rejects_invalid_config() {
    for config in [
        Config::default().with_max_iterations(0),
        Config::default().with_divergence_threshold(-4.0),
        Config::default().with_threads(0),
    ] {
        assert!(matches!(
            Evaluator::new(config),
            Err(Error::InvalidArgument(_))
        ));
    }
}
