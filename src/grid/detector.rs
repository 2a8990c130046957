use log::debug;

use super::{Band, GridLayout};
use crate::config::{CutConfig, GridTuning};
use crate::sprite::PixelBuffer;

/// Largest number of bands accepted per axis (layouts up to 3x3)
const MAX_BANDS: usize = 3;

/// Infer the cell grid of a sheet.
///
/// Tries drawn separator lines first, then whitespace gaps, and falls back
/// to treating the whole sheet as one cell. Never fails; `sheet` must have
/// non-zero dimensions.
pub fn detect(sheet: &PixelBuffer, config: &CutConfig) -> GridLayout {
    let profiles = Profiles::measure(sheet, config.white_threshold);

    detect_separator_lines(&profiles, &config.grid)
        .or_else(|| detect_white_gaps(&profiles, &config.grid))
        .unwrap_or_else(|| {
            debug!("no grid found, using the whole sheet as one cell");
            GridLayout::single(sheet.width(), sheet.height())
        })
}

/// Fraction of background-like pixels in every row and column
struct Profiles {
    rows: Vec<f32>,
    columns: Vec<f32>,
}

impl Profiles {
    fn measure(sheet: &PixelBuffer, white_threshold: u8) -> Self {
        let mut rows = vec![0u32; sheet.height() as usize];
        let mut columns = vec![0u32; sheet.width() as usize];

        for (x, y, pixel) in sheet.as_rgba().enumerate_pixels() {
            let [r, g, b, a] = pixel.0;
            let background =
                a == 0 || (r >= white_threshold && g >= white_threshold && b >= white_threshold);
            if background {
                rows[y as usize] += 1;
                columns[x as usize] += 1;
            }
        }

        Self {
            rows: whiteness(&rows, sheet.width()),
            columns: whiteness(&columns, sheet.height()),
        }
    }
}

/// Fractions of background-like pixels along one axis, given counts over `span` pixels
fn whiteness(counts: &[u32], span: u32) -> Vec<f32> {
    counts
        .iter()
        .map(|&count| count as f32 / span as f32)
        .collect()
}

/// Maximal runs of `true` in `mask`
fn find_runs(mask: &[bool]) -> Vec<Band> {
    let mut runs = Vec::new();
    let mut start = None;

    for (i, &set) in (0u32..).zip(mask) {
        match (set, start) {
            (true, None) => start = Some(i),
            (false, Some(s)) => {
                runs.push(Band::new(s, i));
                start = None;
            }
            _ => {}
        }
    }
    if let Some(s) = start {
        runs.push(Band::new(s, mask.len() as u32));
    }

    runs
}

#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "fractions are validated to [0, 1], so the product fits in u32"
)]
fn fraction_of(total: u32, fraction: f32) -> u32 {
    (total as f32 * fraction).ceil() as u32
}

// ─────────────────────────────────────────────────────────────────────────────
// Separator lines
// ─────────────────────────────────────────────────────────────────────────────

fn detect_separator_lines(profiles: &Profiles, tuning: &GridTuning) -> Option<GridLayout> {
    let rows = content_bands(&profiles.rows, tuning);
    let columns = content_bands(&profiles.columns, tuning);

    debug!(
        "separator strategy: {} row band(s), {} column band(s)",
        rows.len(),
        columns.len()
    );

    let plausible = |n: usize| (1..=MAX_BANDS).contains(&n);
    if !plausible(rows.len()) || !plausible(columns.len()) {
        return None;
    }
    if rows.len() < 2 && columns.len() < 2 {
        return None;
    }

    Some(GridLayout::new(rows, columns))
}

/// Runs of non-separator lines, with slivers folded into the separators.
///
/// A filled run thicker than `max_separator_extent` is content (a wide dark
/// sprite), not a separator.
fn content_bands(whiteness: &[f32], tuning: &GridTuning) -> Vec<Band> {
    let filled: Vec<bool> = whiteness
        .iter()
        .map(|&w| 1.0 - w > tuning.separator_fraction)
        .collect();

    let mut content = vec![true; whiteness.len()];
    for line in find_runs(&filled) {
        if line.len() <= tuning.max_separator_extent {
            content[line.start as usize..line.end as usize].fill(false);
        }
    }

    find_runs(&content)
        .into_iter()
        .filter(|band| band.len() > tuning.min_band_extent)
        .collect()
}

// ─────────────────────────────────────────────────────────────────────────────
// White gaps
// ─────────────────────────────────────────────────────────────────────────────

fn detect_white_gaps(profiles: &Profiles, tuning: &GridTuning) -> Option<GridLayout> {
    let rows = split_at_gaps(&profiles.rows, tuning);
    let columns = split_at_gaps(&profiles.columns, tuning);

    debug!(
        "white-gap strategy: rows {}, columns {}",
        rows.as_ref().map_or(1, Vec::len),
        columns.as_ref().map_or(1, Vec::len)
    );

    if rows.is_none() && columns.is_none() {
        return None;
    }

    let full = |profile: &[f32]| vec![Band::new(0, profile.len() as u32)];
    Some(GridLayout::new(
        rows.unwrap_or_else(|| full(&profiles.rows)),
        columns.unwrap_or_else(|| full(&profiles.columns)),
    ))
}

/// Bands for one axis, or `None` when no balanced split exists.
fn split_at_gaps(whiteness: &[f32], tuning: &GridTuning) -> Option<Vec<Band>> {
    let total = whiteness.len() as u32;
    let min_width = fraction_of(total, tuning.min_gap_fraction).max(1);
    let margin = fraction_of(total, tuning.edge_margin_fraction);

    let is_gap: Vec<bool> = whiteness.iter().map(|&w| w > tuning.gap_fraction).collect();
    let mut gaps: Vec<Band> = find_runs(&is_gap)
        .into_iter()
        .filter(|gap| gap.len() >= min_width)
        .filter(|gap| gap.start > margin && gap.end + margin < total)
        .collect();

    // Widest first; the sort is stable so ties keep their sheet order
    gaps.sort_by(|a, b| b.len().cmp(&a.len()));

    for count in [2, 1] {
        if gaps.len() < count {
            continue;
        }
        let mut chosen = gaps[..count].to_vec();
        chosen.sort_by_key(|gap| gap.start);

        let bands = bands_between(&chosen, total);
        if is_balanced(&bands, tuning.balance_ratio) {
            return Some(bands);
        }
    }

    None
}

/// The runs left over once `gaps` (sorted, interior) are cut out of `0..total`
fn bands_between(gaps: &[Band], total: u32) -> Vec<Band> {
    let mut bands = Vec::with_capacity(gaps.len() + 1);
    let mut start = 0;
    for gap in gaps {
        bands.push(Band::new(start, gap.start));
        start = gap.end;
    }
    bands.push(Band::new(start, total));
    bands
}

fn is_balanced(bands: &[Band], ratio: f32) -> bool {
    let sizes = bands.iter().map(Band::len);
    match (sizes.clone().min(), sizes.max()) {
        (Some(min), Some(max)) => max as f32 <= min as f32 * ratio,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{self, BLACK, CELL, LINE, WHITE};
    use crate::grid::Rect;

    fn detect_rgba(image: image::RgbaImage) -> GridLayout {
        detect(&PixelBuffer::from_rgba(image), &CutConfig::default())
    }

    fn evenly(count: u32, size: u32, spacing: u32) -> Vec<Band> {
        (0..count)
            .map(|i| Band::new(i * (size + spacing), i * (size + spacing) + size))
            .collect()
    }

    #[test]
    fn test_find_runs() {
        let mask = [true, true, false, true, false, false, true];
        assert_eq!(
            find_runs(&mask),
            vec![Band::new(0, 2), Band::new(3, 4), Band::new(6, 7)]
        );
        assert!(find_runs(&[false, false]).is_empty());
    }

    #[test]
    fn test_separator_grid_3x3() {
        let layout = detect_rgba(fixtures::separator_sheet(3, 3));

        assert_eq!(layout.rows, evenly(3, CELL, LINE));
        assert_eq!(layout.columns, evenly(3, CELL, LINE));
    }

    #[test]
    fn test_separator_grid_3x2() {
        let layout = detect_rgba(fixtures::separator_sheet(3, 2));

        assert_eq!(layout.row_count(), 3);
        assert_eq!(layout.column_count(), 2);
        assert_eq!(layout.columns, evenly(2, CELL, LINE));
    }

    #[test]
    fn test_separator_bands_exclude_outer_frame() {
        // 2x2 grid surrounded by a 2px black frame
        let inner = fixtures::separator_sheet(2, 2);
        let side = inner.width() + 4;
        let mut sheet = fixtures::filled(side, side, BLACK);
        image::imageops::replace(&mut sheet, &inner, 2, 2);

        let layout = detect_rgba(sheet);

        let expected = vec![Band::new(2, 2 + CELL), Band::new(2 + CELL + LINE, 2 + 2 * CELL + LINE)];
        assert_eq!(layout.rows, expected);
        assert_eq!(layout.columns, expected);
    }

    #[test]
    fn test_wide_dark_sprite_is_not_a_separator() {
        let mut sheet = fixtures::filled(200, 200, WHITE);
        fixtures::fill(&mut sheet, Rect::new(2, 60, 196, 80), fixtures::palette(7));

        assert_eq!(detect_rgba(sheet.clone()), GridLayout::single(200, 200));

        let config = CutConfig::default().target_size(0).padding(0);
        let sprites = crate::pipeline::process(&PixelBuffer::from_rgba(sheet), &config).unwrap();
        assert_eq!(sprites.len(), 1);
        assert_eq!(sprites[0].placement.crop, Rect::new(2, 60, 196, 80));
    }

    #[test]
    fn test_separator_thickness_is_tunable() {
        // A 30px bar is content by default; a raised limit makes it a separator
        let mut sheet = fixtures::filled(100, 130, WHITE);
        fixtures::fill(&mut sheet, Rect::new(0, 50, 100, 30), BLACK);
        fixtures::fill(&mut sheet, Rect::new(40, 15, 20, 20), fixtures::palette(0));
        fixtures::fill(&mut sheet, Rect::new(40, 95, 20, 20), fixtures::palette(1));

        let grid = GridTuning {
            max_separator_extent: 30,
            ..GridTuning::default()
        };
        let layout = detect(&PixelBuffer::from_rgba(sheet), &CutConfig::default().grid(grid));
        assert_eq!(layout.rows, vec![Band::new(0, 50), Band::new(80, 130)]);
        assert_eq!(layout.columns, vec![Band::new(0, 100)]);
    }

    #[test]
    fn test_separator_slivers_fold_into_lines() {
        // A second line 4px below the first leaves a sliver that is no band
        let mut sheet = fixtures::separator_sheet(2, 2);
        let width = sheet.width();
        fixtures::fill(&mut sheet, Rect::new(0, CELL + 2 * LINE, width, LINE), BLACK);

        let layout = detect_rgba(sheet);

        let below = CELL + 3 * LINE;
        assert_eq!(layout.rows, vec![Band::new(0, CELL), Band::new(below, 2 * CELL + LINE)]);
        assert_eq!(layout.columns, evenly(2, CELL, LINE));
    }

    #[test]
    fn test_thin_white_line_inside_sprite_is_no_gap() {
        // 2px white seam through one wide sprite; narrower than the minimum gap
        let mut sheet = fixtures::filled(200, 60, WHITE);
        fixtures::fill(&mut sheet, Rect::new(10, 10, 180, 40), fixtures::palette(2));
        fixtures::fill(&mut sheet, Rect::new(99, 0, 2, 60), WHITE);

        assert_eq!(detect_rgba(sheet), GridLayout::single(200, 60));
    }

    #[test]
    fn test_too_many_separator_bands_rejected() {
        // 4x4 is not a supported layout, and there is no white gap to fall back on
        let sheet = fixtures::separator_sheet(4, 4);
        let (width, height) = sheet.dimensions();

        assert_eq!(detect_rgba(sheet), GridLayout::single(width, height));
    }

    #[test]
    fn test_white_gap_grid_2x2() {
        let layout = detect_rgba(fixtures::gap_sheet(2, 2, 10, 20));

        // Squares span 15..45 and 75..105; the gap run is 45..75
        let expected = vec![Band::new(0, 45), Band::new(75, 120)];
        assert_eq!(layout.rows, expected);
        assert_eq!(layout.columns, expected);
    }

    #[test]
    fn test_white_gap_grid_3x3() {
        let layout = detect_rgba(fixtures::gap_sheet(3, 3, 10, 20));

        let expected = vec![Band::new(0, 45), Band::new(75, 105), Band::new(135, 180)];
        assert_eq!(layout.rows, expected);
        assert_eq!(layout.columns, expected);
    }

    #[test]
    fn test_white_gap_single_axis() {
        // One row of two sprites: columns split, rows stay whole
        let layout = detect_rgba(fixtures::gap_sheet(1, 2, 10, 20));

        assert_eq!(layout.rows, vec![Band::new(0, 60)]);
        assert_eq!(layout.columns, vec![Band::new(0, 45), Band::new(75, 120)]);
    }

    #[test]
    fn test_unbalanced_gap_collapses() {
        // A narrow sprite and a wide one: 40px vs 130px bands
        let mut sheet = fixtures::filled(200, 60, WHITE);
        fixtures::fill(&mut sheet, Rect::new(10, 10, 30, 40), fixtures::palette(0));
        fixtures::fill(&mut sheet, Rect::new(70, 10, 120, 40), fixtures::palette(1));

        assert_eq!(detect_rgba(sheet), GridLayout::single(200, 60));
    }

    #[test]
    fn test_balance_ratio_is_tunable() {
        let mut sheet = fixtures::filled(200, 60, WHITE);
        fixtures::fill(&mut sheet, Rect::new(10, 10, 30, 40), fixtures::palette(0));
        fixtures::fill(&mut sheet, Rect::new(70, 10, 120, 40), fixtures::palette(1));

        let grid = GridTuning {
            balance_ratio: 4.0,
            ..GridTuning::default()
        };
        let config = CutConfig::default().grid(grid);
        let layout = detect(&PixelBuffer::from_rgba(sheet), &config);

        assert_eq!(layout.columns, vec![Band::new(0, 40), Band::new(70, 200)]);
    }

    #[test]
    fn test_uniform_sheets_fall_back_to_single_cell() {
        for color in [WHITE, BLACK, fixtures::palette(2)] {
            let layout = detect_rgba(fixtures::filled(90, 60, color));
            assert_eq!(layout, GridLayout::single(90, 60));
        }
    }

    #[test]
    fn test_transparent_pixels_count_as_background() {
        let sheet = fixtures::gap_sheet(2, 2, 10, 20);
        let mut transparent = sheet.clone();
        for pixel in transparent.pixels_mut() {
            if *pixel == WHITE {
                *pixel = image::Rgba([0, 0, 0, 0]);
            }
        }

        assert_eq!(detect_rgba(transparent), detect_rgba(sheet));
    }

    #[test]
    fn test_is_balanced() {
        assert!(is_balanced(&[Band::new(0, 45), Band::new(75, 120)], 1.6));
        assert!(is_balanced(
            &[Band::new(0, 45), Band::new(75, 105), Band::new(135, 180)],
            1.6
        ));
        assert!(!is_balanced(&[Band::new(0, 40), Band::new(70, 200)], 1.6));
    }
}
