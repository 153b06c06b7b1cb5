// saves the generated data as json, or the scene as an obj file
// by iterating through all the meshes

use bevy::prelude::*;
use bevy::render::mesh::{Indices, VertexAttributeValues};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::city::RfDataResponse;
use crate::systems::city::scene::CityBuilding;
use crate::systems::city::CityData;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json, // buildings + rf points payload
    Obj,  // world space scene geometry
}

impl ExportFormat {
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Obj => "obj",
        }
    }
}

// export event
#[derive(Event)]
pub struct ExportEvent {
    pub format: ExportFormat,
    pub filename: String,
}

impl ExportEvent {
    // rf_city_<unix seconds>.<ext> in the current directory
    pub fn timestamped(format: ExportFormat) -> Self {
        let timestamp = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|elapsed| elapsed.as_secs())
            .unwrap_or_default();
        Self {
            format,
            filename: format!("rf_city_{}.{}", timestamp, format.extension()),
        }
    }
}

pub fn export_json(data: &RfDataResponse, path: impl AsRef<Path>) -> crate::Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    writer.write_all(data.to_json_pretty()?.as_bytes())?;
    writer.flush()?;
    Ok(())
}

/// Writes every mesh as its own OBJ object, vertices in world space. Returns the object count.
pub fn write_obj<'a, W: Write>(
    writer: &mut W,
    objects: impl IntoIterator<Item = (&'a str, &'a Mesh, &'a GlobalTransform)>,
) -> crate::Result<usize> {
    // OBJ header
    writeln!(writer, "# Exported from rf_city")?;

    // OBJ format indices start at 1
    let mut vertex_offset = 1u32;
    let mut mesh_count = 0;

    for (name, mesh, transform) in objects {
        let Some(VertexAttributeValues::Float32x3(vertices)) = mesh.attribute(Mesh::ATTRIBUTE_POSITION) else {
            continue;
        };

        writeln!(writer, "o {}_{}", name, mesh_count)?;
        for vertex in vertices {
            let world = transform.transform_point(Vec3::from_array(*vertex));
            writeln!(writer, "v {} {} {}", world.x, world.y, world.z)?;
        }

        // write faces using the mesh indices
        let faces: Vec<u32> = match mesh.indices() {
            Some(Indices::U16(indices)) => indices.iter().map(|&i| u32::from(i)).collect(),
            Some(Indices::U32(indices)) => indices.clone(),
            None => (0..vertices.len() as u32).collect(),
        };
        for chunk in faces.chunks_exact(3) {
            writeln!(
                writer,
                "f {} {} {}",
                vertex_offset + chunk[0],
                vertex_offset + chunk[1],
                vertex_offset + chunk[2]
            )?;
        }

        vertex_offset += vertices.len() as u32;
        writeln!(writer)?;
        mesh_count += 1;
    }

    writer.flush()?;
    Ok(mesh_count)
}

pub fn export_obj<'a>(
    objects: impl IntoIterator<Item = (&'a str, &'a Mesh, &'a GlobalTransform)>,
    path: impl AsRef<Path>,
) -> crate::Result<usize> {
    let mut writer = BufWriter::new(File::create(path)?);
    write_obj(&mut writer, objects)
}

// handle export events
pub fn handle_export(
    mut events: EventReader<ExportEvent>,
    meshes: Res<Assets<Mesh>>,
    data: Res<CityData>,
    mesh_entities: Query<(&Mesh3d, &GlobalTransform, Option<&CityBuilding>)>,
) {
    for event in events.read() {
        let result = match event.format {
            ExportFormat::Json => export_json(&data.0, &event.filename).map(|()| 1),
            ExportFormat::Obj => export_obj(
                mesh_entities.iter().filter_map(|(mesh3d, transform, building)| {
                    let name = building.map_or("mesh", |b| b.id.as_str());
                    meshes.get(&mesh3d.0).map(|mesh| (name, mesh, transform))
                }),
                &event.filename,
            ),
        };

        match result {
            Ok(count) => info!("Exported {} object(s) to {}", count, event.filename),
            Err(e) => error!("Export to {} failed: {}", event.filename, e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn obj_vertices_are_in_world_space() {
        let mesh = Mesh::from(Cuboid::new(2.0, 2.0, 2.0));
        let transform = GlobalTransform::from_translation(Vec3::new(10.0, 0.0, 0.0));

        let mut out = Vec::new();
        let count = write_obj(&mut out, [("highrise-0", &mesh, &transform)]).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert_eq!(count, 1);
        assert!(text.contains("o highrise-0_0"));

        let xs: Vec<f32> = text
            .lines()
            .filter_map(|l| l.strip_prefix("v "))
            .map(|l| l.split(' ').next().unwrap().parse().unwrap())
            .collect();
        assert_eq!(xs.len(), mesh.count_vertices());
        assert!(xs.iter().all(|x| *x == 9.0 || *x == 11.0));

        // cuboid: 6 faces, 2 triangles each, indices 1-based
        let faces: Vec<&str> = text.lines().filter(|l| l.starts_with("f ")).collect();
        assert_eq!(faces.len(), 12);
        assert!(!text.contains("f 0 "));
    }

    #[test]
    fn json_export_round_trips() {
        let data = crate::generate();
        let path = std::env::temp_dir().join(format!("rf_city_export_{}.json", std::process::id()));

        export_json(&data, &path).unwrap();
        let read: RfDataResponse = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(read.buildings.len(), data.buildings.len());
        assert_eq!(read.rf_points.len(), 600);
    }

    #[test]
    fn export_to_missing_directory_is_an_io_error() {
        let path = std::env::temp_dir().join("rf_city_missing_dir").join("out.json");
        let err = export_json(&RfDataResponse::default(), path).unwrap_err();
        assert!(matches!(err, crate::Error::Io(_)));
    }

    #[test]
    fn timestamped_names_carry_the_extension() {
        assert!(ExportEvent::timestamped(ExportFormat::Obj).filename.ends_with(".obj"));
        assert!(ExportEvent::timestamped(ExportFormat::Json).filename.starts_with("rf_city_"));
    }
}
