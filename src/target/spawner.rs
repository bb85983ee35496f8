use super::{Rect, Target, TargetId};
use crate::config::{FallbackBounds, GameConfig};
use log::debug;
use rand::Rng;

/// Creates targets at random positions with strictly increasing ids.
#[derive(Debug, Clone)]
pub struct Spawner {
    next_id: TargetId,
    surface_width: u32,
    surface_height: u32,
    target_width: u32,
    target_height: u32,
    fallback: Option<FallbackBounds>,
}

impl Spawner {
    /// Spawner for the surface and target size in `config`, starting at id 0.
    pub fn new(config: &GameConfig) -> Self {
        Self {
            next_id: 0,
            surface_width: config.surface_width,
            surface_height: config.surface_height,
            target_width: config.target_width,
            target_height: config.target_height,
            fallback: config.fallback,
        }
    }

    /// The id the next spawn will receive, which is also the number of
    /// targets spawned so far.
    pub fn next_id(&self) -> TargetId {
        self.next_id
    }

    /// Draws a new target that fits the surface.
    pub fn spawn<R: Rng>(&mut self, rng: &mut R) -> Target {
        let mut x = draw(rng, self.surface_width, self.target_width);
        let mut y = draw(rng, self.surface_height, self.target_height);

        if let Some(fallback) = &self.fallback
            && (x >= fallback.limit_x || y >= fallback.limit_y)
        {
            x = draw(rng, fallback.region_width, self.target_width);
            y = draw(rng, fallback.region_height, self.target_height);
        }

        let id = self.next_id;
        self.next_id += 1;
        let bounds = Rect::new(
            x as i32,
            y as i32,
            self.target_width,
            self.target_height,
        );
        debug!("[spawner] target {id} at {bounds:?}");
        Target { id, bounds }
    }
}

/// Uniform offset in `0..=extent - size`, or 0 when `size` does not fit.
fn draw<R: Rng>(rng: &mut R, extent: u32, size: u32) -> u32 {
    rng.gen_range(0..=extent.saturating_sub(size))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_spawns_fit_surface() {
        let config = GameConfig {
            fallback: None,
            ..GameConfig::default()
        };
        let mut spawner = Spawner::new(&config);
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..2000 {
            let target = spawner.spawn(&mut rng);
            assert!(
                target
                    .bounds
                    .fits_within(config.surface_width, config.surface_height),
                "{:?} escapes the surface",
                target.bounds
            );
        }
    }

    #[test]
    fn test_fallback_keeps_targets_in_region() {
        let config = GameConfig::default();
        let fallback = config.fallback.unwrap();
        let mut spawner = Spawner::new(&config);
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..2000 {
            let bounds = spawner.spawn(&mut rng).bounds;
            assert!(bounds.fits_within(config.surface_width, config.surface_height));
            assert!(bounds.x < fallback.limit_x as i32);
            assert!(bounds.y < fallback.limit_y as i32);
        }
    }

    #[test]
    fn test_ids_are_sequential() {
        let mut spawner = Spawner::new(&GameConfig::default());
        let mut rng = StdRng::seed_from_u64(3);
        let ids: Vec<_> = (0..5).map(|_| spawner.spawn(&mut rng).id).collect();
        assert_eq!(ids, vec![0, 1, 2, 3, 4]);
        assert_eq!(spawner.next_id(), 5);
    }

    #[test]
    fn test_target_as_large_as_surface() {
        let config = GameConfig {
            surface_width: 80,
            surface_height: 80,
            fallback: None,
            ..GameConfig::default()
        };
        let mut spawner = Spawner::new(&config);
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(spawner.spawn(&mut rng).bounds, Rect::new(0, 0, 80, 80));
    }
}
