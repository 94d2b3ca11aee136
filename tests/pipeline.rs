use nalgebra::Vector4;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use raster_pipeline::core::rasterizer::rasterize_triangle;
use raster_pipeline::core::{
    FnProgram, FragmentAttributes, FrameBuffer, FrameBufferAttributes, ParallelRasterizer,
    Program, RasterError, UniformAttributes, VertexAttributes, rasterize_lines,
    rasterize_triangles,
};
use raster_pipeline::io::load_mesh;
use raster_pipeline::io::render_settings::RenderSettings;
use raster_pipeline::scene::render_mesh;
use raster_pipeline::shading::depth_test_blend;
use raster_pipeline::utils::save_utils::save_frame_buffer;

/// Identity vertex shader, vertex color, `z` as depth, strict depth test.
fn depth_program() -> impl Program + Sync {
    FnProgram::new(
        |va: &VertexAttributes, _: &UniformAttributes| *va,
        |va: &VertexAttributes, _: &UniformAttributes| FragmentAttributes {
            color: va.color,
            position: va.position,
            distance: va.position.z,
        },
        depth_test_blend,
    )
}

/// Counts fragments per cell in the red channel.
fn counting_program() -> impl Program + Sync {
    FnProgram::new(
        |va: &VertexAttributes, _: &UniformAttributes| *va,
        |va: &VertexAttributes, _: &UniformAttributes| FragmentAttributes {
            position: va.position,
            ..FragmentAttributes::new(1.0, 0.0, 0.0)
        },
        |fa: &FragmentAttributes, previous: &FrameBufferAttributes| FrameBufferAttributes {
            color: previous.color + fa.color,
            depth: 0.0,
        },
    )
}

fn colored(x: f32, y: f32, z: f32, color: Vector4<f32>) -> VertexAttributes {
    VertexAttributes::new(x, y, z).with_color(color)
}

fn triangle(points: [(f32, f32); 3], z: f32, color: Vector4<f32>) -> [VertexAttributes; 3] {
    points.map(|(x, y)| colored(x, y, z, color))
}

fn red() -> Vector4<f32> {
    Vector4::new(1.0, 0.0, 0.0, 1.0)
}

fn green() -> Vector4<f32> {
    Vector4::new(0.0, 1.0, 0.0, 1.0)
}

fn covered_pixels(fb: &FrameBuffer) -> Vec<(usize, usize)> {
    let mut pixels = Vec::new();
    for y in 0..fb.height() {
        for x in 0..fb.width() {
            if fb.get(x, y).is_some_and(|c| c.depth.is_finite()) {
                pixels.push((x, y));
            }
        }
    }
    pixels
}

#[test]
fn unit_triangle_on_4x4_covers_two_pixels() {
    let vertices = triangle([(0.0, 0.5), (-0.5, -0.5), (0.5, -0.5)], 0.5, red());
    let mut fb = FrameBuffer::new(4, 4);
    rasterize_triangles(&depth_program(), &UniformAttributes::default(), &vertices, &mut fb)
        .unwrap();

    assert_eq!(covered_pixels(&fb), vec![(1, 1), (2, 1)]);
    let cell = fb.get(1, 1).unwrap();
    assert_eq!(cell.color, Vector4::new(255.0, 0.0, 0.0, 255.0));
    assert_eq!(cell.depth, 0.5);
}

#[test]
fn nearer_triangle_wins_in_either_order() {
    let near = triangle([(-1.0, -1.0), (1.0, -1.0), (0.0, 1.0)], 1.0, red());
    let far = triangle([(-1.0, 1.0), (0.0, -1.0), (1.0, 1.0)], 2.0, green());
    let uniform = UniformAttributes::default();

    let mut near_first = FrameBuffer::new(16, 16);
    let list: Vec<_> = near.iter().chain(&far).copied().collect();
    rasterize_triangles(&depth_program(), &uniform, &list, &mut near_first).unwrap();

    let mut far_first = FrameBuffer::new(16, 16);
    let list: Vec<_> = far.iter().chain(&near).copied().collect();
    rasterize_triangles(&depth_program(), &uniform, &list, &mut far_first).unwrap();

    assert_eq!(near_first, far_first);
    // the center pixel is covered by both
    let center = near_first.get(8, 8).unwrap();
    assert_eq!(center.depth, 1.0);
    assert_eq!(center.color, red() * 255.0);
}

#[test]
fn drawing_twice_changes_nothing() {
    let vertices: Vec<_> = [
        triangle([(-0.8, -0.8), (0.6, -0.5), (0.1, 0.9)], 0.3, red()),
        triangle([(-0.2, 0.7), (0.9, 0.2), (0.4, -0.9)], 0.6, green()),
    ]
    .concat();
    let program = depth_program();
    let uniform = UniformAttributes::default();

    let mut once = FrameBuffer::new(32, 32);
    rasterize_triangles(&program, &uniform, &vertices, &mut once).unwrap();
    let mut twice = once.clone();
    rasterize_triangles(&program, &uniform, &vertices, &mut twice).unwrap();
    assert_eq!(once, twice);
}

#[test]
fn off_screen_geometry_leaves_the_buffer_untouched() {
    let vertices = triangle([(1.5, 1.5), (3.0, 1.5), (2.0, 4.0)], 0.5, red());
    let lines = [colored(-3.0, -2.0, 0.0, red()), colored(-2.0, -3.0, 0.0, red())];
    let mut fb = FrameBuffer::new(8, 8);
    let program = depth_program();
    rasterize_triangles(&program, &UniformAttributes::default(), &vertices, &mut fb).unwrap();
    rasterize_lines(&program, &UniformAttributes::default(), &lines, 2.0, &mut fb).unwrap();
    assert_eq!(fb, FrameBuffer::new(8, 8));
}

fn random_triangles(rng: &mut StdRng, count: usize) -> Vec<[VertexAttributes; 3]> {
    (0..count)
        .map(|i| {
            // distinct depths keep the depth test order independent
            let z = 0.1 + i as f32 * 0.01;
            let color = Vector4::new(rng.random(), rng.random(), rng.random(), 1.0);
            let mut point = || (rng.random_range(-1.2..1.2), rng.random_range(-1.2..1.2));
            triangle([point(), point(), point()], z, color)
        })
        .collect()
}

#[test]
fn coverage_and_depth_do_not_depend_on_draw_order() {
    let mut rng = StdRng::seed_from_u64(7);
    let mut triangles = random_triangles(&mut rng, 40);
    let uniform = UniformAttributes::default();
    let (width, height) = (48, 40);

    let expected_fragments: usize = triangles
        .iter()
        .map(|t| rasterize_triangle(t, width, height, |_, _, _| {}))
        .sum();

    let mut reference_depth = FrameBuffer::new(width, height);
    let mut reference_count = FrameBuffer::new(width, height);
    rasterize_triangles(&depth_program(), &uniform, &triangles.concat(), &mut reference_depth)
        .unwrap();
    rasterize_triangles(&counting_program(), &uniform, &triangles.concat(), &mut reference_count)
        .unwrap();

    let total: f32 = reference_count.cells().iter().map(|c| c.color.x).sum();
    assert_eq!(total as usize, expected_fragments);

    for _ in 0..5 {
        triangles.shuffle(&mut rng);
        let vertices = triangles.concat();

        let mut depth = FrameBuffer::new(width, height);
        rasterize_triangles(&depth_program(), &uniform, &vertices, &mut depth).unwrap();
        assert_eq!(depth, reference_depth);

        let mut count = FrameBuffer::new(width, height);
        rasterize_triangles(&counting_program(), &uniform, &vertices, &mut count).unwrap();
        assert_eq!(count, reference_count);
    }
}

#[test]
fn parallel_rasterizer_matches_sequential_on_random_scenes() {
    let mut rng = StdRng::seed_from_u64(42);
    let vertices = random_triangles(&mut rng, 60).concat();
    let uniform = UniformAttributes::default();

    let mut sequential = FrameBuffer::new(64, 64);
    rasterize_triangles(&depth_program(), &uniform, &vertices, &mut sequential).unwrap();
    let mut parallel = FrameBuffer::new(64, 64);
    ParallelRasterizer::rasterize_triangles(&depth_program(), &uniform, &vertices, &mut parallel)
        .unwrap();
    assert_eq!(sequential, parallel);

    let mut counted = FrameBuffer::new(64, 64);
    ParallelRasterizer::rasterize_triangles(&counting_program(), &uniform, &vertices, &mut counted)
        .unwrap();
    let mut expected = FrameBuffer::new(64, 64);
    rasterize_triangles(&counting_program(), &uniform, &vertices, &mut expected).unwrap();
    assert_eq!(counted, expected);
}

#[test]
fn degenerate_geometry_is_skipped_without_nan() {
    let mut at_infinity = colored(0.5, 0.5, 0.0, red());
    at_infinity.position.w = 0.0;
    let vertices = [
        triangle([(-0.5, -0.5), (0.0, 0.0), (0.5, 0.5)], 0.5, red()),
        triangle([(0.2, 0.2), (0.2, 0.2), (0.2, 0.2)], 0.5, red()),
        triangle([(f32::NAN, 0.0), (0.5, 0.0), (0.0, 0.5)], 0.5, red()),
        [colored(-0.5, -0.5, 0.0, red()), colored(0.5, -0.5, 0.0, red()), at_infinity],
    ]
    .concat();
    let lines = [
        colored(f32::INFINITY, 0.0, 0.0, red()),
        colored(0.0, 0.0, 0.0, red()),
        at_infinity,
        colored(0.0, 0.0, 0.0, red()),
    ];

    let mut fb = FrameBuffer::new(16, 16);
    let program = depth_program();
    rasterize_triangles(&program, &UniformAttributes::default(), &vertices, &mut fb).unwrap();
    rasterize_lines(&program, &UniformAttributes::default(), &lines, 1.0, &mut fb).unwrap();
    assert_eq!(fb, FrameBuffer::new(16, 16));
    assert!(fb.to_rgba_bytes().iter().all(|&b| b == 0));
}

#[test]
fn malformed_vertex_lists_are_rejected_before_drawing() {
    let vertices = [
        triangle([(-1.0, -1.0), (1.0, -1.0), (0.0, 1.0)], 0.5, red()).to_vec(),
        vec![colored(0.0, 0.0, 0.0, red())],
    ]
    .concat();
    let mut fb = FrameBuffer::new(8, 8);
    let program = depth_program();
    let uniform = UniformAttributes::default();

    let err = rasterize_triangles(&program, &uniform, &vertices, &mut fb).unwrap_err();
    assert!(matches!(err, RasterError::InvalidVertexCount { count: 4, .. }));
    assert!(rasterize_lines(&program, &uniform, &vertices[..3], 1.0, &mut fb).is_err());
    assert!(
        ParallelRasterizer::rasterize_triangles(&program, &uniform, &vertices, &mut fb).is_err()
    );
    assert_eq!(fb, FrameBuffer::new(8, 8));
}

#[test]
fn thick_line_crosses_the_frame() {
    let y = 0.5 / 8.0; // center line of row 8 in a 16-row frame
    let lines = [colored(-1.0, y, 0.5, red()), colored(1.0, y, 0.5, green())];
    let mut fb = FrameBuffer::new(16, 16);
    rasterize_lines(&depth_program(), &UniformAttributes::default(), &lines, 1.0, &mut fb)
        .unwrap();

    let pixels = covered_pixels(&fb);
    assert_eq!(pixels, (0..16).map(|x| (x, 8)).collect::<Vec<_>>());
    // colors run from red to green along the segment
    let left = fb.get(0, 8).unwrap().color;
    let right = fb.get(15, 8).unwrap().color;
    assert!(left.x > left.y && right.y > right.x);
}

#[test]
fn off_file_renders_to_png() {
    let dir = std::env::temp_dir();
    let mesh_path = dir.join(format!("raster_pipeline_it_{}.off", std::process::id()));
    let image_path = dir.join(format!("raster_pipeline_it_{}.png", std::process::id()));
    std::fs::write(
        &mesh_path,
        "OFF
4 4 6
-0.5 -0.5 0.5
0.5 -0.5 0.5
0.0 0.5 0.5
0.0 0.0 -0.5
3 0 1 2
3 0 3 1
3 1 3 2
3 2 3 0
",
    )
    .unwrap();

    let mesh = load_mesh(&mesh_path).unwrap();
    let settings = RenderSettings {
        width: 80,
        height: 60,
        ..Default::default()
    };
    let mut fb = FrameBuffer::new(settings.width, settings.height);
    render_mesh(&settings, &mesh, &mut fb).unwrap();
    save_frame_buffer(&image_path, &fb).unwrap();

    let image = image::open(&image_path).unwrap().to_rgba8();
    std::fs::remove_file(&mesh_path).ok();
    std::fs::remove_file(&image_path).ok();

    assert_eq!(image.dimensions(), (80, 60));
    // the front face is drawn in the middle of the picture, fully opaque
    assert_eq!(image.get_pixel(40, 30).0[3], 255);
    // corners stay empty
    assert_eq!(image.get_pixel(0, 0).0, [0, 0, 0, 0]);
}
