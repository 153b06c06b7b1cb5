// per building visual variation
// seeded from a hash of the building id
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::Building;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cosmetics {
    pub roughness: f32,
    pub metallic: f32,
    // rooftop block (machine room) dimensions
    pub roof_width: f32,
    pub roof_depth: f32,
    pub roof_height: f32,
}

impl Cosmetics {
    pub fn for_building(building: &Building) -> Self {
        let mut rng = StdRng::seed_from_u64(u64::from(fnv1a(&building.id)));

        Self {
            roughness: 0.65 + rng.random::<f32>() * 0.2,
            metallic: 0.15 + rng.random::<f32>() * 0.2,
            roof_width: building.width * (0.28 + rng.random::<f32>() * 0.18),
            roof_depth: building.depth * (0.25 + rng.random::<f32>() * 0.2),
            roof_height: (building.height * (0.05 + rng.random::<f32>() * 0.05)).max(1.0),
        }
    }
}

/// 32 bit FNV-1a over the utf-8 bytes
pub fn fnv1a(text: &str) -> u32 {
    text.bytes().fold(0x811c_9dc5, |hash, byte| (hash ^ u32::from(byte)).wrapping_mul(0x0100_0193))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::sample_tower;

    #[test]
    fn fnv_reference_values() {
        assert_eq!(fnv1a(""), 0x811c_9dc5);
        assert_eq!(fnv1a("a"), 0xe40c_292c);
    }

    #[test]
    fn same_id_same_look() {
        let tower = sample_tower();
        assert_eq!(Cosmetics::for_building(&tower), Cosmetics::for_building(&tower.clone()));

        let other = Building { id: "highrise-1".to_string(), ..tower.clone() };
        assert_ne!(Cosmetics::for_building(&tower), Cosmetics::for_building(&other));
    }

    #[test]
    fn values_stay_in_their_bands() {
        let tower = sample_tower();
        let look = Cosmetics::for_building(&tower);

        assert!((0.65..=0.85).contains(&look.roughness));
        assert!((0.15..=0.35).contains(&look.metallic));
        assert!(look.roof_width >= tower.width * 0.28 && look.roof_width <= tower.width * 0.46);
        assert!(look.roof_height >= 1.0 && look.roof_height <= tower.height * 0.1);
    }
}
