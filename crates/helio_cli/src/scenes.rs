//! Built-in scene catalog.
//!
//! Each builder returns the world root (a BVH over the primitive list) and a
//! configured camera. Scene randomness uses a fixed seed so repeated runs
//! produce the same world.

use helio_render::{
    gen_f64, gen_range, make_box, BvhNode, Camera, CheckerTexture, Color, ConstantMedium,
    Dielectric, DiffuseLight, Hittable, HittableList, ImageTexture, Lambertian, Metal, Point3,
    Quad, RotateY, Sphere, Texture, Translate, Vec3,
};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use std::sync::Arc;

/// Seed for the randomized scene layouts.
const SCENE_SEED: u64 = 7;

/// Sky color shared by the daylight scenes.
const SKY: Color = Color::new(0.7, 0.8, 1.0);

/// Build the world and camera for a scene selector, or None if the selector
/// is not one of the built-in scenes.
pub fn build(selector: u32) -> Option<(Arc<dyn Hittable>, Camera)> {
    match selector {
        1 => Some(three_spheres()),
        2 => Some(bouncing_spheres()),
        3 => Some(checkered_spheres()),
        4 => Some(earth()),
        5 => Some(quads()),
        6 => Some(simple_lights()),
        7 => Some(cornell_box()),
        8 => Some(cornell_smoke()),
        _ => None,
    }
}

fn world_root(list: HittableList) -> Arc<dyn Hittable> {
    Arc::new(BvhNode::from_list(list))
}

fn random_color(rng: &mut dyn RngCore) -> Color {
    Color::new(gen_f64(rng), gen_f64(rng), gen_f64(rng))
}

fn random_color_range(rng: &mut dyn RngCore, min: f64, max: f64) -> Color {
    Color::new(
        gen_range(rng, min, max),
        gen_range(rng, min, max),
        gen_range(rng, min, max),
    )
}

/// A ground sphere, a diffuse sphere, a glass sphere with a hollow bubble
/// inside (negative radius), and a fuzzy metal sphere.
fn three_spheres() -> (Arc<dyn Hittable>, Camera) {
    let mut world = HittableList::new();

    world.add(Arc::new(Sphere::new(
        Point3::new(0.0, -100.5, -1.0),
        100.0,
        Arc::new(Lambertian::new(Color::new(0.8, 0.8, 0.0))),
    )));
    world.add(Arc::new(Sphere::new(
        Point3::new(0.0, 0.0, -1.0),
        0.5,
        Arc::new(Lambertian::new(Color::new(0.7, 0.3, 0.3))),
    )));

    // Glass sphere with an inside-out sphere nested in it: the flipped
    // normals make the pair render as a hollow bubble
    let glass = Arc::new(Dielectric::new(1.5));
    world.add(Arc::new(Sphere::new(
        Point3::new(-1.0, 0.0, -1.0),
        0.5,
        glass.clone(),
    )));
    world.add(Arc::new(Sphere::new(
        Point3::new(-1.0, 0.0, -1.0),
        -0.45,
        glass,
    )));

    world.add(Arc::new(Sphere::new(
        Point3::new(1.0, 0.0, -1.0),
        0.5,
        Arc::new(Metal::new(Color::new(0.8, 0.6, 0.2), 1.0)),
    )));

    let camera = Camera::new()
        .with_image(16.0 / 9.0, 400)
        .with_view(Point3::new(3.0, 0.0, 2.0), Point3::new(0.0, 0.0, -1.0), Vec3::Y)
        .with_lens(90.0, 0.0)
        .with_quality(100, 50)
        .with_background(SKY);

    (world_root(world), camera)
}

/// The classic cover scene: a grid of small randomized spheres, some of them
/// bouncing over the shutter interval, around three large feature spheres.
fn bouncing_spheres() -> (Arc<dyn Hittable>, Camera) {
    let mut rng = StdRng::seed_from_u64(SCENE_SEED);
    let mut world = HittableList::new();

    let checker: Arc<dyn Texture> = Arc::new(CheckerTexture::new(
        0.32,
        Color::new(0.2, 0.3, 0.1),
        Color::new(0.9, 0.9, 0.9),
    ));
    world.add(Arc::new(Sphere::new(
        Point3::new(0.0, -1000.0, 0.0),
        1000.0,
        Arc::new(Lambertian::with_texture(checker)),
    )));

    for a in -11..11 {
        for b in -11..11 {
            let choose_mat = gen_f64(&mut rng);
            let center = Point3::new(
                a as f64 + 0.9 * gen_f64(&mut rng),
                0.2,
                b as f64 + 0.9 * gen_f64(&mut rng),
            );

            // Keep clear of the large metal sphere
            if (center - Point3::new(4.0, 0.2, 0.0)).length() <= 0.9 {
                continue;
            }

            if choose_mat < 0.8 {
                let albedo = random_color(&mut rng) * random_color(&mut rng);
                let center1 = center + Vec3::new(0.0, gen_range(&mut rng, 0.0, 0.5), 0.0);
                world.add(Arc::new(Sphere::new_moving(
                    center,
                    center1,
                    0.2,
                    Arc::new(Lambertian::new(albedo)),
                )));
            } else if choose_mat < 0.95 {
                let albedo = random_color_range(&mut rng, 0.5, 1.0);
                let fuzz = gen_range(&mut rng, 0.0, 0.5);
                world.add(Arc::new(Sphere::new(
                    center,
                    0.2,
                    Arc::new(Metal::new(albedo, fuzz)),
                )));
            } else {
                world.add(Arc::new(Sphere::new(
                    center,
                    0.2,
                    Arc::new(Dielectric::new(1.5)),
                )));
            }
        }
    }

    world.add(Arc::new(Sphere::new(
        Point3::new(0.0, 1.0, 0.0),
        1.0,
        Arc::new(Dielectric::new(1.5)),
    )));
    world.add(Arc::new(Sphere::new(
        Point3::new(-4.0, 1.0, 0.0),
        1.0,
        Arc::new(Lambertian::new(Color::new(0.4, 0.2, 0.1))),
    )));
    world.add(Arc::new(Sphere::new(
        Point3::new(4.0, 1.0, 0.0),
        1.0,
        Arc::new(Metal::new(Color::new(0.7, 0.6, 0.5), 0.0)),
    )));

    let camera = Camera::new()
        .with_image(16.0 / 9.0, 400)
        .with_view(Point3::new(13.0, 2.0, 3.0), Point3::ZERO, Vec3::Y)
        .with_lens(20.0, 0.1)
        .with_quality(100, 50)
        .with_background(SKY);

    (world_root(world), camera)
}

/// Two large spheres sharing one checker texture.
fn checkered_spheres() -> (Arc<dyn Hittable>, Camera) {
    let mut world = HittableList::new();

    let checker: Arc<dyn Texture> = Arc::new(CheckerTexture::new(
        0.32,
        Color::new(0.2, 0.3, 0.1),
        Color::new(0.9, 0.9, 0.9),
    ));

    world.add(Arc::new(Sphere::new(
        Point3::new(0.0, -10.0, 0.0),
        10.0,
        Arc::new(Lambertian::with_texture(checker.clone())),
    )));
    world.add(Arc::new(Sphere::new(
        Point3::new(0.0, 10.0, 0.0),
        10.0,
        Arc::new(Lambertian::with_texture(checker)),
    )));

    let camera = Camera::new()
        .with_image(16.0 / 9.0, 400)
        .with_view(Point3::new(13.0, 2.0, 3.0), Point3::ZERO, Vec3::Y)
        .with_lens(20.0, 0.0)
        .with_quality(100, 50)
        .with_background(SKY);

    (world_root(world), camera)
}

/// A globe wrapped in an image texture. A missing earthmap.jpg renders the
/// red fallback rather than failing.
fn earth() -> (Arc<dyn Hittable>, Camera) {
    let mut world = HittableList::new();

    let earth_texture: Arc<dyn Texture> = Arc::new(ImageTexture::load("earthmap.jpg"));
    world.add(Arc::new(Sphere::new(
        Point3::ZERO,
        2.0,
        Arc::new(Lambertian::with_texture(earth_texture)),
    )));

    let camera = Camera::new()
        .with_image(16.0 / 9.0, 400)
        .with_view(Point3::new(0.0, 0.0, 12.0), Point3::ZERO, Vec3::Y)
        .with_lens(20.0, 0.0)
        .with_quality(100, 50)
        .with_background(SKY);

    (world_root(world), camera)
}

/// Five colored quads boxing in the view.
fn quads() -> (Arc<dyn Hittable>, Camera) {
    let mut world = HittableList::new();

    world.add(Arc::new(Quad::new(
        Point3::new(-3.0, -2.0, 5.0),
        Vec3::new(0.0, 0.0, -4.0),
        Vec3::new(0.0, 4.0, 0.0),
        Arc::new(Lambertian::new(Color::new(1.0, 0.2, 0.2))),
    )));
    world.add(Arc::new(Quad::new(
        Point3::new(-2.0, -2.0, 0.0),
        Vec3::new(4.0, 0.0, 0.0),
        Vec3::new(0.0, 4.0, 0.0),
        Arc::new(Lambertian::new(Color::new(0.2, 1.0, 0.2))),
    )));
    world.add(Arc::new(Quad::new(
        Point3::new(3.0, -2.0, 1.0),
        Vec3::new(0.0, 0.0, 4.0),
        Vec3::new(0.0, 4.0, 0.0),
        Arc::new(Lambertian::new(Color::new(0.2, 0.2, 1.0))),
    )));
    world.add(Arc::new(Quad::new(
        Point3::new(-2.0, 3.0, 1.0),
        Vec3::new(4.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, 4.0),
        Arc::new(Lambertian::new(Color::new(1.0, 0.5, 0.0))),
    )));
    world.add(Arc::new(Quad::new(
        Point3::new(-2.0, -3.0, 5.0),
        Vec3::new(4.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, -4.0),
        Arc::new(Lambertian::new(Color::new(0.2, 0.8, 0.8))),
    )));

    let camera = Camera::new()
        .with_image(1.0, 400)
        .with_view(Point3::new(0.0, 0.0, 9.0), Point3::ZERO, Vec3::Y)
        .with_lens(80.0, 0.0)
        .with_quality(100, 50)
        .with_background(SKY);

    (world_root(world), camera)
}

/// Emissive quad and sphere lighting a dark scene.
fn simple_lights() -> (Arc<dyn Hittable>, Camera) {
    let mut world = HittableList::new();

    let checker: Arc<dyn Texture> = Arc::new(CheckerTexture::new(
        2.0,
        Color::new(0.2, 0.3, 0.1),
        Color::new(0.9, 0.9, 0.9),
    ));
    world.add(Arc::new(Sphere::new(
        Point3::new(0.0, -1000.0, 0.0),
        1000.0,
        Arc::new(Lambertian::with_texture(checker)),
    )));
    world.add(Arc::new(Sphere::new(
        Point3::new(0.0, 2.0, 0.0),
        2.0,
        Arc::new(Lambertian::new(Color::new(0.4, 0.6, 0.8))),
    )));

    let light = Arc::new(DiffuseLight::new(Color::new(4.0, 4.0, 4.0)));
    world.add(Arc::new(Quad::new(
        Point3::new(3.0, 1.0, -2.0),
        Vec3::new(2.0, 0.0, 0.0),
        Vec3::new(0.0, 2.0, 0.0),
        light.clone(),
    )));
    world.add(Arc::new(Sphere::new(Point3::new(0.0, 7.0, 0.0), 2.0, light)));

    let camera = Camera::new()
        .with_image(16.0 / 9.0, 400)
        .with_view(Point3::new(26.0, 3.0, 6.0), Point3::new(0.0, 2.0, 0.0), Vec3::Y)
        .with_lens(20.0, 0.0)
        .with_quality(100, 50)
        .with_background(Color::ZERO);

    (world_root(world), camera)
}

/// Cornell box walls, light and the two boxes shared by scenes 7 and 8.
fn cornell_walls(world: &mut HittableList, light_color: Color, light_q: Point3, light_u: Vec3, light_v: Vec3) {
    let red = Arc::new(Lambertian::new(Color::new(0.65, 0.05, 0.05)));
    let white = Arc::new(Lambertian::new(Color::new(0.73, 0.73, 0.73)));
    let green = Arc::new(Lambertian::new(Color::new(0.12, 0.45, 0.15)));

    world.add(Arc::new(Quad::new(
        Point3::new(555.0, 0.0, 0.0),
        Vec3::new(0.0, 555.0, 0.0),
        Vec3::new(0.0, 0.0, 555.0),
        green,
    )));
    world.add(Arc::new(Quad::new(
        Point3::ZERO,
        Vec3::new(0.0, 555.0, 0.0),
        Vec3::new(0.0, 0.0, 555.0),
        red,
    )));
    world.add(Arc::new(Quad::new(
        light_q,
        light_u,
        light_v,
        Arc::new(DiffuseLight::new(light_color)),
    )));
    world.add(Arc::new(Quad::new(
        Point3::ZERO,
        Vec3::new(555.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, 555.0),
        white.clone(),
    )));
    world.add(Arc::new(Quad::new(
        Point3::new(555.0, 555.0, 555.0),
        Vec3::new(-555.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, -555.0),
        white.clone(),
    )));
    world.add(Arc::new(Quad::new(
        Point3::new(0.0, 0.0, 555.0),
        Vec3::new(555.0, 0.0, 0.0),
        Vec3::new(0.0, 555.0, 0.0),
        white,
    )));
}

/// The two rotated boxes inside the Cornell box.
fn cornell_boxes() -> (Arc<dyn Hittable>, Arc<dyn Hittable>) {
    let white = Arc::new(Lambertian::new(Color::new(0.73, 0.73, 0.73)));

    let tall = Arc::new(make_box(
        Point3::ZERO,
        Point3::new(165.0, 330.0, 165.0),
        white.clone(),
    ));
    let tall = Arc::new(RotateY::new(tall, 15.0));
    let tall = Arc::new(Translate::new(tall, Vec3::new(265.0, 0.0, 295.0)));

    let short = Arc::new(make_box(
        Point3::ZERO,
        Point3::new(165.0, 165.0, 165.0),
        white,
    ));
    let short = Arc::new(RotateY::new(short, -18.0));
    let short = Arc::new(Translate::new(short, Vec3::new(130.0, 0.0, 65.0)));

    (tall, short)
}

fn cornell_camera() -> Camera {
    Camera::new()
        .with_image(1.0, 600)
        .with_view(
            Point3::new(278.0, 278.0, -800.0),
            Point3::new(278.0, 278.0, 0.0),
            Vec3::Y,
        )
        .with_lens(40.0, 0.0)
        .with_quality(200, 50)
        .with_background(Color::ZERO)
}

/// The standard Cornell box with two rotated boxes.
fn cornell_box() -> (Arc<dyn Hittable>, Camera) {
    let mut world = HittableList::new();
    cornell_walls(
        &mut world,
        Color::new(15.0, 15.0, 15.0),
        Point3::new(343.0, 554.0, 332.0),
        Vec3::new(-130.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, -105.0),
    );

    let (tall, short) = cornell_boxes();
    world.add(tall);
    world.add(short);

    (world_root(world), cornell_camera())
}

/// Cornell box where the boxes become volumes of smoke and fog.
fn cornell_smoke() -> (Arc<dyn Hittable>, Camera) {
    let mut world = HittableList::new();
    // A dimmer but larger ceiling light suits the haze
    cornell_walls(
        &mut world,
        Color::new(7.0, 7.0, 7.0),
        Point3::new(113.0, 554.0, 127.0),
        Vec3::new(330.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, 305.0),
    );

    let (tall, short) = cornell_boxes();
    world.add(Arc::new(ConstantMedium::new(tall, 0.01, Color::ZERO)));
    world.add(Arc::new(ConstantMedium::new(short, 0.01, Color::ONE)));

    (world_root(world), cornell_camera())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_selectors_build() {
        for selector in 1..=8 {
            let scene = build(selector);
            assert!(scene.is_some(), "scene {selector} failed to build");
        }
    }

    #[test]
    fn test_unknown_selectors_rejected() {
        assert!(build(0).is_none());
        assert!(build(9).is_none());
        assert!(build(1000).is_none());
    }

    #[test]
    fn test_cornell_world_bounds() {
        let (world, _) = build(7).unwrap();
        let bbox = world.bounding_box();
        assert!(bbox.x.contains(278.0));
        assert!(bbox.y.contains(554.0));
        assert!(bbox.z.contains(278.0));
    }

    #[test]
    fn test_scene_build_is_reproducible() {
        let (world_a, _) = build(2).unwrap();
        let (world_b, _) = build(2).unwrap();

        // Same seed, same layout: the union bounds must match exactly
        assert_eq!(world_a.bounding_box(), world_b.bounding_box());
    }
}
