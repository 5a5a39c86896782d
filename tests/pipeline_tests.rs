//! # Pipeline Tests
//!
//! End-to-end properties of the render pipeline: output sizes, headers,
//! validation, determinism and the quantizer round trips.
//!
//! Most tests render with the fixed-metrics font so results do not depend
//! on bundled font data. The scenario tests go through the public
//! `render_tri`/`render_preview` functions and the shared Spleen faces.

use cartela::canvas::{HEIGHT, WIDTH};
use cartela::card::{CardModel, PieceType, TechRow};
use cartela::encode::{decode_tri, encode_tri, encoded_len};
use cartela::error::{CartelaError, ValidationError};
use cartela::font::FontCache;
use cartela::layout::{DrawOp, LayoutEngine};
use cartela::photo::Photo;
use cartela::quantize::{DitherStrategy, NearestColor, Quantize, ScanOrder};
use cartela::raster::{PaletteIndex, RgbRaster, WHITE};
use cartela::render::{self, CardRenderer, RenderConfig};
use image::{DynamicImage, Rgb, Rgba, RgbaImage};
use pretty_assertions::assert_eq;

// ============================================================================
// HELPER FUNCTIONS
// ============================================================================

fn trex() -> CardModel {
    CardModel {
        title: "T-Rex Skull".into(),
        bullets: vec![
            "Cretaceous".into(),
            "North America".into(),
            "".into(),
            "".into(),
        ],
        tech: vec![],
        image_scale: 1.0,
        ..Default::default()
    }
}

fn gradient_photo() -> Photo {
    let img = RgbaImage::from_fn(64, 48, |x, y| {
        Rgba([(x * 4) as u8, (y * 5) as u8, ((x + y) * 2) as u8, 255])
    });
    Photo::new(DynamicImage::ImageRgba8(img))
}

fn busy_card() -> CardModel {
    CardModel {
        piece_number: "117".into(),
        cabinet_number: "4".into(),
        piece_type: PieceType::Artifact,
        title: "Commodore 64 home computer with datasette and joystick".into(),
        subtitle: "8-bit home computer".into(),
        year: "1982".into(),
        bullets: vec![
            "MOS 6510 at 1 MHz".into(),
            "64 KB RAM".into(),
            "SID sound chip".into(),
            "Best-selling single computer model of all time according to most sources".into(),
        ],
        tech: vec![
            TechRow::new("CPU", "MOS 6510"),
            TechRow::new("RAM", "64 KB"),
            TechRow::new("Video", "VIC-II"),
            TechRow::new("Sound", "SID 6581"),
        ],
        notes: "Donated by a local collector.\n".repeat(20),
        image_scale: 1.4,
        ..Default::default()
    }
    .with_photo(gradient_photo())
}

fn cards() -> Vec<CardModel> {
    vec![CardModel::default(), trex(), busy_card()]
}

// ============================================================================
// TRI OUTPUT
// ============================================================================

#[test]
fn test_trex_scenario() {
    let bytes = render::render_tri(&trex(), 2).unwrap();

    assert_eq!(&bytes[0..4], b"TRI1");
    assert_eq!(&bytes[4..6], &[0x01, 0xE0]);
    assert_eq!(&bytes[6..8], &[0x02, 0x9E]);
    assert_eq!(bytes.len(), 8 + 670 * 120);
    assert_eq!(bytes.len(), 80408);
}

#[test]
fn test_tri_length_for_every_level() {
    let fonts = FontCache::fixed_metrics();
    let renderer = CardRenderer::new(&fonts);

    for card in cards() {
        for level in 0..4 {
            let config = RenderConfig::new(level).unwrap();
            let bytes = renderer.render_tri(&card, &config).unwrap();
            assert_eq!(bytes.len(), encoded_len(WIDTH, HEIGHT));
            assert_eq!(u16::from_be_bytes([bytes[4], bytes[5]]), 480);
            assert_eq!(u16::from_be_bytes([bytes[6], bytes[7]]), 670);
        }
    }
}

#[test]
fn test_reserved_index_never_emitted() {
    let fonts = FontCache::fixed_metrics();
    let renderer = CardRenderer::new(&fonts);

    for level in 0..4 {
        let config = RenderConfig::new(level).unwrap();
        let bytes = renderer.render_tri(&busy_card(), &config).unwrap();
        let raster = decode_tri(&bytes).unwrap();
        assert_eq!(raster.histogram()[PaletteIndex::Reserved as usize], 0);
    }
}

#[test]
fn test_text_only_card_is_identical_at_every_level() {
    // Ink is always an exact palette color, so dithering has nothing to do
    let fonts = FontCache::fixed_metrics();
    let renderer = CardRenderer::new(&fonts);
    let mut card = busy_card();
    card.photo = None;

    let reference = renderer
        .render_tri(&card, &RenderConfig::new(0).unwrap())
        .unwrap();
    for level in 1..4 {
        let bytes = renderer
            .render_tri(&card, &RenderConfig::new(level).unwrap())
            .unwrap();
        assert!(bytes == reference, "level {} changed text pixels", level);
    }
}

// ============================================================================
// VALIDATION
// ============================================================================

#[test]
fn test_invalid_dither_level() {
    let err = render::render_tri(&trex(), 99).unwrap_err();
    assert!(matches!(
        err,
        CartelaError::Validation(ValidationError::DitherLevel(99))
    ));

    let err = render::render_preview(&trex(), -1).unwrap_err();
    assert!(matches!(
        err,
        CartelaError::Validation(ValidationError::DitherLevel(-1))
    ));
}

#[test]
fn test_five_bullets_rejected() {
    let card = CardModel {
        bullets: vec!["a".into(), "b".into(), "c".into(), "d".into(), "e".into()],
        ..Default::default()
    };
    let err = render::render_tri(&card, 0).unwrap_err();
    assert!(matches!(
        err,
        CartelaError::Validation(ValidationError::TooManyBullets(5))
    ));
}

#[test]
fn test_five_tech_rows_rejected() {
    let card = CardModel {
        tech: vec![TechRow::new("k", "v"); 5],
        ..Default::default()
    };
    assert!(matches!(
        render::render_preview(&card, 0),
        Err(CartelaError::Validation(ValidationError::TooManyTechRows(5)))
    ));
}

#[test]
fn test_non_positive_image_scale_rejected() {
    let card = CardModel {
        image_scale: 0.0,
        ..Default::default()
    };
    assert!(matches!(
        render::render_tri(&card, 1),
        Err(CartelaError::Validation(ValidationError::ImageScale(_)))
    ));
}

// ============================================================================
// BULLET ROWS
// ============================================================================

fn bullet_markers(card: &CardModel, fonts: &FontCache) -> usize {
    LayoutEngine::new(fonts)
        .layout(card)
        .ops()
        .iter()
        .filter(|op| {
            matches!(op, DrawOp::FillRect { rect, .. } if rect.width == 6 && rect.height == 6)
        })
        .count()
}

#[test]
fn test_four_bullets_render_four_rows() {
    let fonts = FontCache::fixed_metrics();
    let card = CardModel {
        bullets: vec!["one".into(), "two".into(), "three".into(), "four".into()],
        ..Default::default()
    };
    assert_eq!(bullet_markers(&card, &fonts), 4);

    let renderer = CardRenderer::new(&fonts);
    let bytes = renderer
        .render_tri(&card, &RenderConfig::new(0).unwrap())
        .unwrap();
    assert_eq!(bytes.len(), 80408);
}

#[test]
fn test_no_bullets_leave_rows_blank() {
    let fonts = FontCache::fixed_metrics();
    let card = CardModel::default();
    assert_eq!(bullet_markers(&card, &fonts), 0);

    // Without a photo the bullet rows sit at y 204..300; nothing is drawn there
    let raster = CardRenderer::new(&fonts)
        .composite(&card, &RenderConfig::new(0).unwrap())
        .unwrap();
    for y in 204..300 {
        for x in 0..WIDTH {
            assert_eq!(raster.get(x, y), WHITE, "ink at ({}, {})", x, y);
        }
    }
}

// ============================================================================
// QUANTIZER PROPERTIES
// ============================================================================

#[test]
fn test_level_zero_is_idempotent_on_palette_rasters() {
    let fonts = FontCache::fixed_metrics();
    let renderer = CardRenderer::new(&fonts);

    for level in 0..4 {
        let tri = renderer
            .quantized(&busy_card(), &RenderConfig::new(level).unwrap())
            .unwrap();
        let again = NearestColor.quantize(&tri.to_rgb());
        assert!(again == tri, "level {} drifted on re-quantization", level);
    }
}

#[test]
fn test_quantization_is_deterministic() {
    let fonts = FontCache::fixed_metrics();
    let renderer = CardRenderer::new(&fonts);
    let config = RenderConfig::new(0).unwrap();
    let composite = renderer.composite(&busy_card(), &config).unwrap();

    for level in 0..4 {
        let strategy = DitherStrategy::from_level(level).unwrap();
        let a = strategy.quantize(&composite);
        let b = strategy.quantize(&composite);
        assert!(a == b);
        assert!(encode_tri(&a).unwrap() == encode_tri(&b).unwrap());
    }
}

#[test]
fn test_tri_round_trip() {
    let fonts = FontCache::fixed_metrics();
    let tri = CardRenderer::new(&fonts)
        .quantized(&busy_card(), &RenderConfig::new(3).unwrap())
        .unwrap();

    let decoded = decode_tri(&encode_tri(&tri).unwrap()).unwrap();
    assert!(decoded == tri);
}

fn gray(v: u32) -> Rgb<u8> {
    let v = v as u8;
    Rgb([v, v, v])
}

fn assert_scan_orders_agree(raster: &RgbRaster) {
    let forward = DitherStrategy::ErrorDiffusion(ScanOrder::Raster).quantize(raster);
    let serpentine = DitherStrategy::ErrorDiffusion(ScanOrder::Serpentine).quantize(raster);

    assert_eq!(forward.histogram(), serpentine.histogram());
    assert!(encode_tri(&forward).unwrap() != encode_tri(&serpentine).unwrap());
}

#[test]
fn test_serpentine_and_raster_share_histogram_on_horizontal_gradient() {
    let raster = RgbRaster::from_fn(WIDTH, HEIGHT, |x, _| gray(x * 255 / (WIDTH - 1)));
    assert_scan_orders_agree(&raster);
}

#[test]
fn test_serpentine_and_raster_share_histogram_on_vertical_gradient() {
    let raster = RgbRaster::from_fn(WIDTH, HEIGHT, |_, y| gray(y * 255 / (HEIGHT - 1)));
    assert_scan_orders_agree(&raster);
}

#[test]
fn test_serpentine_and_raster_share_histogram_on_flat_gray() {
    let raster = RgbRaster::filled(WIDTH, HEIGHT, gray(100));
    assert_scan_orders_agree(&raster);
}

// ============================================================================
// PREVIEW
// ============================================================================

#[test]
fn test_preview_is_canvas_sized_png() {
    let png = render::render_preview(&trex(), 0).unwrap();
    let decoded = image::load_from_memory(&png).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (480, 670));
}

#[test]
fn test_preview_is_deterministic() {
    let fonts = FontCache::fixed_metrics();
    let renderer = CardRenderer::new(&fonts);
    let config = RenderConfig::new(2).unwrap();
    assert!(
        renderer.render_preview(&busy_card(), &config).unwrap()
            == renderer.render_preview(&busy_card(), &config).unwrap()
    );
}

#[test]
fn test_device_accurate_preview_uses_palette_only() {
    let fonts = FontCache::fixed_metrics();
    let config = RenderConfig::new(2).unwrap().with_device_accurate(true);
    let png = CardRenderer::new(&fonts)
        .render_preview(&busy_card(), &config)
        .unwrap();

    let decoded = image::load_from_memory(&png).unwrap().into_rgb8();
    let palette = [[255, 255, 255], [0, 0, 0], [220, 0, 0]];
    assert!(decoded.pixels().all(|px| palette.contains(&px.0)));
}
