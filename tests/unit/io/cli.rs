//! Tests for command-line parsing and batch mesh builds

#[cfg(test)]
mod tests {
    use clap::Parser;
    use paratile::io::cli::{Cli, Command, FileProcessor};
    use paratile::io::configuration::{DEFAULT_DENSITY, DEFAULT_SEED};
    use paratile::io::persistence::load_document;
    use std::ffi::OsStr;
    use std::fs;
    use std::path::{Path, PathBuf};

    const CATALOG_JSON: &str = r#"{
        "tiles": [
            {
                "name": "grass",
                "sprite": {
                    "texture": { "width": 64, "height": 16 },
                    "rect": { "x": 0, "y": 0, "width": 16, "height": 16 },
                    "pixels_per_unit": 16
                }
            },
            { "name": "marker" }
        ]
    }"#;

    const TILEMAP_JSON: &str = r#"{
        "cells": [
            { "position": { "row": 0, "col": 0 }, "sprite_index": 0 },
            { "position": { "row": 0, "col": 1 }, "sprite_index": 1 },
            { "position": { "row": 2, "col": 1 }, "sprite_index": 0 }
        ]
    }"#;

    fn parse(args: &[&dyn AsRef<OsStr>]) -> Cli {
        Cli::parse_from(args.iter().map(|arg| arg.as_ref().to_os_string()))
    }

    fn write_fixture(dir: &Path) -> (PathBuf, PathBuf) {
        let catalog = dir.join("catalog.json");
        let tilemap = dir.join("level.json");
        fs::write(&catalog, CATALOG_JSON).expect("write catalog");
        fs::write(&tilemap, TILEMAP_JSON).expect("write tilemap");
        (catalog, tilemap)
    }

    // Tests build parsing with only required arguments
    // Verified by defaulting --png to true
    #[test]
    fn test_parse_build_minimal_args() {
        let cli = Cli::parse_from(["paratile", "build", "maps", "--catalog", "tiles.json"]);

        assert!(!cli.quiet);
        let Command::Build(args) = cli.command else {
            unreachable!("expected build subcommand");
        };
        assert_eq!(args.target, PathBuf::from("maps"));
        assert_eq!(args.catalog, PathBuf::from("tiles.json"));
        assert!(!args.png);
        assert!(!args.no_skip);
    }

    #[test]
    fn test_parse_generate_defaults() {
        let cli = Cli::parse_from([
            "paratile", "--quiet", "generate", "out.json", "--rows", "4", "--cols", "5",
            "--tiles", "3",
        ]);

        assert!(cli.quiet);
        assert!(!cli.should_show_progress());
        let Command::Generate(args) = cli.command else {
            unreachable!("expected generate subcommand");
        };
        assert_eq!((args.rows, args.cols, args.tiles), (4, 5, 3));
        assert!((args.density - DEFAULT_DENSITY).abs() < f64::EPSILON);
        assert_eq!(args.seed, DEFAULT_SEED);
    }

    // Tests that negative world coordinates are not mistaken for flags
    #[test]
    fn test_parse_locate_negative_coordinates() {
        let cli = Cli::parse_from(["paratile", "locate", "level.json", "-1.5", "2.25"]);

        let Command::Locate(args) = cli.command else {
            unreachable!("expected locate subcommand");
        };
        assert!((args.x + 1.5).abs() < f32::EPSILON);
        assert!((args.y - 2.25).abs() < f32::EPSILON);
        assert!(args.z.abs() < f32::EPSILON);
    }

    #[test]
    fn test_output_paths_sit_next_to_input() {
        let input = Path::new("maps/level.json");
        assert_eq!(
            FileProcessor::get_mesh_path(input),
            PathBuf::from("maps/level_mesh.obj")
        );
        assert_eq!(
            FileProcessor::get_preview_path(input),
            PathBuf::from("maps/level_preview.png")
        );
    }

    // Tests the full build path from documents to OBJ and PNG files
    #[test]
    fn test_build_writes_mesh_and_preview() {
        let dir = tempfile::tempdir().expect("temp dir");
        let (catalog, tilemap) = write_fixture(dir.path());

        let cli = parse(&[
            &"paratile",
            &"--quiet",
            &"build",
            &tilemap,
            &"--catalog",
            &catalog,
            &"--png",
        ]);
        cli.run().expect("build succeeds");

        let obj = fs::read_to_string(dir.path().join("level_mesh.obj")).expect("mesh written");
        assert_eq!(obj.lines().filter(|line| line.starts_with("v ")).count(), 12);
        assert_eq!(obj.lines().filter(|line| line.starts_with("f ")).count(), 4);
        assert!(dir.path().join("level_preview.png").exists());
    }

    // Tests that existing outputs are skipped unless --no-skip is given
    #[test]
    fn test_build_skips_existing_output() {
        let dir = tempfile::tempdir().expect("temp dir");
        let (catalog, _) = write_fixture(dir.path());
        let mesh_path = dir.path().join("level_mesh.obj");
        fs::write(&mesh_path, "placeholder").expect("write placeholder");

        let target = dir.path();
        parse(&[&"paratile", &"--quiet", &"build", &target, &"--catalog", &catalog])
            .run()
            .expect("skipping succeeds");
        assert_eq!(fs::read_to_string(&mesh_path).ok().as_deref(), Some("placeholder"));

        parse(&[
            &"paratile",
            &"--quiet",
            &"build",
            &target,
            &"--catalog",
            &catalog,
            &"--no-skip",
        ])
        .run()
        .expect("rebuild succeeds");
        let obj = fs::read_to_string(&mesh_path).expect("mesh written");
        assert!(obj.starts_with("# paratile OBJ export"));
    }

    #[test]
    fn test_build_rejects_missing_target() {
        let dir = tempfile::tempdir().expect("temp dir");
        let (catalog, _) = write_fixture(dir.path());
        let missing = dir.path().join("nowhere");

        let cli = parse(&[&"paratile", &"build", &missing, &"--catalog", &catalog]);
        assert!(cli.run().is_err());
    }

    #[test]
    fn test_generate_writes_document() {
        let dir = tempfile::tempdir().expect("temp dir");
        let output = dir.path().join("generated").join("random.json");

        let cli = parse(&[
            &"paratile",
            &"generate",
            &output,
            &"--rows",
            &"6",
            &"--cols",
            &"6",
            &"--tiles",
            &"2",
            &"--density",
            &"1.0",
        ]);
        cli.run().expect("generate succeeds");

        let document = load_document(&output).expect("document written");
        assert_eq!(document.cells.len(), 36);
    }
}
