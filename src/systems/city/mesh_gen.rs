use bevy::color::ColorToComponents;
use bevy::prelude::*;
use bevy::render::mesh::{Indices, PrimitiveTopology};
use bevy::render::render_asset::RenderAssetUsages;

use crate::city::{Building, MetricModel};

// bins without any point
const EMPTY_BIN_COLOR: Color = Color::srgb(0.35, 0.35, 0.35);

// vertical strip of colored bins hovering in front of the +Z wall, right edge
// one flat colored quad per bin, world space positions
pub fn signal_band(
    building: &Building,
    profile: &[Option<f32>],
    model: &MetricModel,
    band_width: f32,
    wall_offset: f32,
) -> Mesh {
    let mut mesh = Mesh::new(
        PrimitiveTopology::TriangleList,
        RenderAssetUsages::MAIN_WORLD | RenderAssetUsages::RENDER_WORLD,
    );

    if profile.is_empty() {
        return mesh;
    }

    let mut positions = Vec::with_capacity(profile.len() * 4);
    let mut normals = Vec::with_capacity(profile.len() * 4);
    let mut colors = Vec::with_capacity(profile.len() * 4);
    let mut indices = Vec::with_capacity(profile.len() * 6);

    let [bx, _, bz] = building.position;
    let x1 = bx + building.width / 2.0;
    let x0 = x1 - band_width.min(building.width);
    let z = bz + building.depth / 2.0 + wall_offset;
    let bin_height = building.height / profile.len() as f32;
    let bottom = building.bottom();

    for (i, bin) in profile.iter().enumerate() {
        let y0 = bottom + bin_height * i as f32;
        let y1 = y0 + bin_height;
        let color = match bin {
            Some(value) => {
                let [r, g, b] = model.color_at(*value);
                Color::srgb(r, g, b)
            }
            None => EMPTY_BIN_COLOR,
        };
        let base_idx = positions.len() as u32;

        positions.extend([[x0, y0, z], [x1, y0, z], [x0, y1, z], [x1, y1, z]]);
        normals.extend([[0.0, 0.0, 1.0]; 4]);
        colors.extend([color.to_linear().to_f32_array(); 4]);

        indices.extend([base_idx, base_idx + 1, base_idx + 2]);
        indices.extend([base_idx + 1, base_idx + 3, base_idx + 2]);
    }

    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, positions);
    mesh.insert_attribute(Mesh::ATTRIBUTE_NORMAL, normals);
    mesh.insert_attribute(Mesh::ATTRIBUTE_COLOR, colors);
    mesh.insert_indices(Indices::U32(indices));

    mesh
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::sample_tower;

    #[test]
    fn one_quad_per_bin() {
        let tower = sample_tower();
        let profile = vec![Some(0.0), None, Some(1.0), Some(0.5)];
        let mesh = signal_band(&tower, &profile, &MetricModel::default(), 3.0, 0.5);

        assert_eq!(mesh.count_vertices(), 16);
        assert_eq!(mesh.indices().map(|i| i.len()), Some(24));

        let Some(bevy::render::mesh::VertexAttributeValues::Float32x3(positions)) =
            mesh.attribute(Mesh::ATTRIBUTE_POSITION)
        else {
            panic!("positions missing");
        };
        // last bin ends at the roof, band stands in front of the wall
        assert_eq!(positions[15][1], tower.top());
        assert!(positions.iter().all(|p| p[2] == tower.depth / 2.0 + 0.5));
    }

    #[test]
    fn empty_profile_gives_empty_mesh() {
        let mesh = signal_band(&sample_tower(), &[], &MetricModel::default(), 3.0, 0.5);
        assert_eq!(mesh.count_vertices(), 0);
        assert!(mesh.indices().is_none());
    }
}
