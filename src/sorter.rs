//! The sort operation: four modes over one entry point.
//!
//! All modes reduce to stable-sorting contiguous index ranges by a
//! quantized channel key and writing the entries back in place. The
//! palette is duplicated first when it is not editable, so read-only
//! palettes are never mutated.

use crate::channel::{self, ChannelSelector};
use crate::color::Color;
use crate::error::SortError;
use crate::slice::{parse_slice, SliceSpec};
use crate::store::{Context, PaletteHandle, PaletteStore};

/// Which part of the palette a sort operates on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum SortMode {
    /// Every entry.
    All,
    /// Rows described by the slice expression, each sorted independently.
    Slice,
    /// A span bounded by the context's foreground and background colors.
    Autoslice,
    /// Slice rows, split into runs of equal partition-channel key; each
    /// run is sorted by the primary channel.
    Partitioned,
}

/// Parameters of one sort operation, mirroring the host's registration
/// descriptor. The partition fields only matter in `Partitioned` mode.
#[derive(Debug, Clone)]
pub struct SortRequest {
    pub mode: SortMode,
    pub slice: String,
    pub channel: ChannelSelector,
    pub quantize: f64,
    pub ascending: bool,
    pub partition_channel: ChannelSelector,
    pub partition_quantize: f64,
}

impl SortRequest {
    /// Sort everything by one channel with exact keys, descending.
    pub fn simple(channel: ChannelSelector) -> Self {
        Self {
            mode: SortMode::All,
            slice: String::new(),
            channel,
            quantize: 1.0,
            ascending: false,
            partition_channel: channel,
            partition_quantize: 1.0,
        }
    }
}

/// Sort a palette in place and return its handle — or, when the palette
/// is read-only, the handle of the sorted duplicate.
pub fn sort_palette(
    store: &mut dyn PaletteStore,
    ctx: &dyn Context,
    handle: PaletteHandle,
    request: &SortRequest,
) -> Result<PaletteHandle, SortError> {
    let handle = if store.is_editable(handle)? {
        handle
    } else {
        store.duplicate(handle)?
    };
    let numcolors = store.count(handle)?;
    let grain = channel::grain(request.channel, request.quantize, numcolors);

    match request.mode {
        SortMode::All => {
            sort_range(store, handle, 0, numcolors, request, grain)?;
        }
        SortMode::Slice => {
            let spec = parse_slice(&request.slice, numcolors)?;
            sort_rows(store, handle, &spec, numcolors, request, grain)?;
        }
        SortMode::Autoslice => {
            let spec = autoslice_spec(&*store, ctx, handle, numcolors, &request.slice)?;
            sort_rows(store, handle, &spec, numcolors, request, grain)?;
        }
        SortMode::Partitioned => {
            let spec = parse_slice(&request.slice, numcolors)?;
            check_bounds(&spec, numcolors)?;
            let partition_grain = channel::grain(
                request.partition_channel,
                request.partition_quantize,
                numcolors,
            );
            for row in 0..spec.nrows {
                let row_start = spec.start + row * spec.length;
                let runs = partition_runs(
                    &*store,
                    handle,
                    row_start,
                    spec.length,
                    request.partition_channel,
                    partition_grain,
                )?;
                // Each run is an independent sub-sort with partitioning
                // disabled; runs stay contiguous relative to each other.
                for (run_start, run_len) in runs {
                    sort_range(store, handle, run_start, run_len, request, grain)?;
                }
            }
        }
    }
    Ok(handle)
}

/// Resolve the autoslice span from the context's foreground/background
/// colors and the (row-count-only) slice expression.
fn autoslice_spec(
    store: &dyn PaletteStore,
    ctx: &dyn Context,
    handle: PaletteHandle,
    numcolors: usize,
    slice_expr: &str,
) -> Result<SliceSpec, SortError> {
    let fg = find_endpoint(store, handle, numcolors, ctx.foreground())?;
    let bg = find_endpoint(store, handle, numcolors, ctx.background())?;
    let (start, end) = if fg <= bg { (fg, bg) } else { (bg, fg) };
    let span = end - start + 1;

    // A malformed expression is not an error here: fall back to a single
    // row covering the whole span.
    let nrows = parse_slice(slice_expr, span).map(|s| s.nrows).unwrap_or(1);
    if span % nrows != 0 {
        return Err(SortError::UnevenDivision { nrows, span });
    }

    let mut spec = SliceSpec::whole(numcolors);
    spec.start = start;
    spec.nrows = nrows;
    spec.length = span / nrows;
    Ok(spec)
}

/// Locate a marker color by exact RGB match over the whole palette.
fn find_endpoint(
    store: &dyn PaletteStore,
    handle: PaletteHandle,
    numcolors: usize,
    color: Color,
) -> Result<usize, SortError> {
    let mut first = None;
    let mut occurrences = 0;
    for index in 0..numcolors {
        if store.entry(handle, index)?.color.rgb_eq(color) {
            occurrences += 1;
            if first.is_none() {
                first = Some(index);
            }
        }
    }
    match (first, occurrences) {
        (Some(index), 1) => Ok(index),
        (Some(_), occurrences) => Err(SortError::AmbiguousEndpoint { color, occurrences }),
        (None, _) => Err(SortError::ColorNotFound { color }),
    }
}

fn check_bounds(spec: &SliceSpec, numcolors: usize) -> Result<(), SortError> {
    if spec.end() > numcolors {
        return Err(SortError::InsufficientEntries {
            needed: spec.end(),
            available: numcolors,
        });
    }
    Ok(())
}

/// Sort each row of the slice independently, leaving entries outside the
/// slice untouched.
fn sort_rows(
    store: &mut dyn PaletteStore,
    handle: PaletteHandle,
    spec: &SliceSpec,
    numcolors: usize,
    request: &SortRequest,
    grain: f64,
) -> Result<(), SortError> {
    check_bounds(spec, numcolors)?;
    for row in 0..spec.nrows {
        sort_range(
            store,
            handle,
            spec.start + row * spec.length,
            spec.length,
            request,
            grain,
        )?;
    }
    Ok(())
}

/// Stable-sort `len` entries starting at `start` by their quantized
/// primary-channel key, then write names and colors back together per
/// slot.
fn sort_range(
    store: &mut dyn PaletteStore,
    handle: PaletteHandle,
    start: usize,
    len: usize,
    request: &SortRequest,
    grain: f64,
) -> Result<(), SortError> {
    let mut keyed = Vec::with_capacity(len);
    for index in start..start + len {
        let entry = store.entry(handle, index)?;
        let key = channel::bucket(channel::sort_key(request.channel, entry.color, index), grain);
        keyed.push((key, entry));
    }

    // Vec::sort_by is stable: same-bucket entries keep their input order
    // in either direction.
    if request.ascending {
        keyed.sort_by(|a, b| a.0.total_cmp(&b.0));
    } else {
        keyed.sort_by(|a, b| b.0.total_cmp(&a.0));
    }

    for (offset, (_, entry)) in keyed.into_iter().enumerate() {
        store.set_entry(handle, start + offset, entry)?;
    }
    Ok(())
}

/// Split a row into maximal contiguous runs of equal quantized
/// partition-channel key, scanning left to right. Returns
/// `(start, len)` pairs covering the row exactly.
fn partition_runs(
    store: &dyn PaletteStore,
    handle: PaletteHandle,
    start: usize,
    len: usize,
    partition_channel: ChannelSelector,
    partition_grain: f64,
) -> Result<Vec<(usize, usize)>, SortError> {
    let mut runs = Vec::new();
    let mut run_start = start;
    let mut previous: Option<f64> = None;

    for index in start..start + len {
        let entry = store.entry(handle, index)?;
        let key = channel::bucket(
            channel::sort_key(partition_channel, entry.color, index),
            partition_grain,
        );
        if let Some(prev) = previous {
            if key.total_cmp(&prev).is_ne() {
                runs.push((run_start, index - run_start));
                run_start = index;
            }
        }
        previous = Some(key);
    }
    if len > 0 {
        runs.push((run_start, start + len - run_start));
    }
    Ok(runs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{InMemoryStore, PaletteEntry, StaticContext};

    fn make_store(colors: &[(u8, u8, u8)], editable: bool) -> (InMemoryStore, PaletteHandle) {
        let entries = colors
            .iter()
            .enumerate()
            .map(|(i, &(r, g, b))| PaletteEntry::new(format!("c{i}"), Color::rgb(r, g, b)))
            .collect();
        let mut store = InMemoryStore::new();
        let handle = store.insert(entries, editable);
        (store, handle)
    }

    fn ctx() -> StaticContext {
        StaticContext {
            foreground: Color::rgb(0, 0, 0),
            background: Color::rgb(255, 255, 255),
        }
    }

    fn reds(store: &InMemoryStore, handle: PaletteHandle) -> Vec<u8> {
        store
            .entries(handle)
            .unwrap()
            .iter()
            .map(|e| e.color.r)
            .collect()
    }

    #[test]
    fn all_mode_sorts_by_red_ascending_with_stable_ties() {
        let (mut store, handle) = make_store(
            &[(255, 0, 0), (0, 255, 0), (0, 0, 255), (128, 128, 128)],
            true,
        );
        let mut request = SortRequest::simple(ChannelSelector::Red);
        request.ascending = true;

        let out = sort_palette(&mut store, &ctx(), handle, &request).unwrap();
        assert_eq!(out, handle);

        let colors: Vec<_> = store
            .entries(out)
            .unwrap()
            .iter()
            .map(|e| (e.color.r, e.color.g, e.color.b))
            .collect();
        // The two red=0 entries tie; the green one came first and stays
        // first.
        assert_eq!(
            colors,
            vec![(0, 255, 0), (0, 0, 255), (128, 128, 128), (255, 0, 0)]
        );
    }

    #[test]
    fn all_mode_defaults_to_descending() {
        let (mut store, handle) = make_store(&[(1, 0, 0), (3, 0, 0), (2, 0, 0)], true);
        let request = SortRequest::simple(ChannelSelector::Red);
        sort_palette(&mut store, &ctx(), handle, &request).unwrap();
        assert_eq!(reds(&store, handle), vec![3, 2, 1]);
    }

    #[test]
    fn read_only_palette_is_duplicated_not_mutated() {
        let (mut store, handle) = make_store(&[(2, 0, 0), (1, 0, 0)], false);
        let mut request = SortRequest::simple(ChannelSelector::Red);
        request.ascending = true;

        let out = sort_palette(&mut store, &ctx(), handle, &request).unwrap();
        assert_ne!(out, handle);
        assert_eq!(reds(&store, handle), vec![2, 1]);
        assert_eq!(reds(&store, out), vec![1, 2]);
    }

    #[test]
    fn names_travel_with_their_colors() {
        let (mut store, handle) = make_store(&[(9, 0, 0), (1, 0, 0)], true);
        let mut request = SortRequest::simple(ChannelSelector::Red);
        request.ascending = true;
        sort_palette(&mut store, &ctx(), handle, &request).unwrap();

        let entries = store.entries(handle).unwrap();
        assert_eq!(entries[0].name, "c1");
        assert_eq!(entries[0].color.r, 1);
        assert_eq!(entries[1].name, "c0");
        assert_eq!(entries[1].color.r, 9);
    }

    #[test]
    fn slice_mode_sorts_rows_independently() {
        let (mut store, handle) = make_store(
            &[(4, 0, 0), (3, 0, 0), (1, 0, 0), (2, 0, 0), (9, 0, 0)],
            true,
        );
        let mut request = SortRequest::simple(ChannelSelector::Red);
        request.mode = SortMode::Slice;
        request.slice = "0:2,2".into();
        request.ascending = true;

        sort_palette(&mut store, &ctx(), handle, &request).unwrap();
        // Rows [0..2) and [2..4) sorted separately; entry 4 untouched.
        assert_eq!(reds(&store, handle), vec![3, 4, 1, 2, 9]);
    }

    #[test]
    fn slice_mode_rejects_oversized_slice() {
        let (mut store, handle) = make_store(&[(1, 0, 0), (2, 0, 0), (3, 0, 0)], true);
        let mut request = SortRequest::simple(ChannelSelector::Red);
        request.mode = SortMode::Slice;
        request.slice = "1:1,3".into();

        let err = sort_palette(&mut store, &ctx(), handle, &request).unwrap_err();
        assert!(matches!(
            err,
            SortError::InsufficientEntries {
                needed: 4,
                available: 3
            }
        ));
    }

    #[test]
    fn slice_mode_rounded_down_sorts_covered_prefix_only() {
        // ":3" over 7 entries: 3 rows of 2, entry 6 left alone.
        let (mut store, handle) = make_store(
            &[
                (2, 0, 0),
                (1, 0, 0),
                (4, 0, 0),
                (3, 0, 0),
                (6, 0, 0),
                (5, 0, 0),
                (0, 0, 0),
            ],
            true,
        );
        let mut request = SortRequest::simple(ChannelSelector::Red);
        request.mode = SortMode::Slice;
        request.slice = ":3".into();
        request.ascending = true;

        sort_palette(&mut store, &ctx(), handle, &request).unwrap();
        assert_eq!(reds(&store, handle), vec![1, 2, 3, 4, 5, 6, 0]);
    }

    #[test]
    fn partitioned_mode_keeps_groups_contiguous() {
        // Partition by green (two groups), sort by red within each.
        let (mut store, handle) = make_store(
            &[(3, 0, 0), (1, 0, 0), (2, 0, 0), (9, 200, 0), (7, 200, 0)],
            true,
        );
        let mut request = SortRequest::simple(ChannelSelector::Red);
        request.mode = SortMode::Partitioned;
        request.ascending = true;
        request.partition_channel = ChannelSelector::Green;
        request.partition_quantize = 1.0;

        sort_palette(&mut store, &ctx(), handle, &request).unwrap();
        assert_eq!(reds(&store, handle), vec![1, 2, 3, 7, 9]);
    }

    #[test]
    fn partitioned_singletons_are_noops() {
        // Every entry has a distinct partition key: nothing moves even
        // though the primary order is descending by red.
        let (mut store, handle) = make_store(&[(1, 10, 0), (9, 20, 0), (5, 30, 0)], true);
        let mut request = SortRequest::simple(ChannelSelector::Red);
        request.mode = SortMode::Partitioned;
        request.ascending = true;
        request.partition_channel = ChannelSelector::Green;

        sort_palette(&mut store, &ctx(), handle, &request).unwrap();
        assert_eq!(reds(&store, handle), vec![1, 9, 5]);
    }

    #[test]
    fn partition_quantization_merges_near_keys() {
        // Grain 256/4 = 64: greens 10 and 60 share a bucket, 200 does
        // not, so the first two entries form one run sorted by red.
        let (mut store, handle) = make_store(&[(9, 10, 0), (1, 60, 0), (5, 200, 0)], true);
        let mut request = SortRequest::simple(ChannelSelector::Red);
        request.mode = SortMode::Partitioned;
        request.ascending = true;
        request.partition_channel = ChannelSelector::Green;
        request.partition_quantize = 4.0;

        sort_palette(&mut store, &ctx(), handle, &request).unwrap();
        assert_eq!(reds(&store, handle), vec![1, 9, 5]);
    }

    #[test]
    fn autoslice_sorts_span_between_markers() {
        let (mut store, handle) = make_store(
            &[(50, 50, 50), (0, 0, 0), (9, 1, 1), (3, 1, 1), (255, 255, 255)],
            true,
        );
        let mut request = SortRequest::simple(ChannelSelector::Red);
        request.mode = SortMode::Autoslice;
        request.ascending = true;

        sort_palette(&mut store, &ctx(), handle, &request).unwrap();
        // Span is [1, 4]; entry 0 untouched.
        assert_eq!(reds(&store, handle), vec![50, 0, 3, 9, 255]);
    }

    #[test]
    fn autoslice_missing_color_fails() {
        let (mut store, handle) = make_store(&[(0, 0, 0), (5, 5, 5)], true);
        let mut request = SortRequest::simple(ChannelSelector::Red);
        request.mode = SortMode::Autoslice;

        let err = sort_palette(&mut store, &ctx(), handle, &request).unwrap_err();
        assert!(matches!(err, SortError::ColorNotFound { color } if color.r == 255));
    }

    #[test]
    fn autoslice_duplicate_color_is_ambiguous() {
        let (mut store, handle) = make_store(
            &[(0, 0, 0), (255, 255, 255), (0, 0, 0), (255, 255, 255)],
            true,
        );
        let mut request = SortRequest::simple(ChannelSelector::Red);
        request.mode = SortMode::Autoslice;

        let err = sort_palette(&mut store, &ctx(), handle, &request).unwrap_err();
        assert!(matches!(
            err,
            SortError::AmbiguousEndpoint {
                occurrences: 2,
                ..
            }
        ));
    }

    #[test]
    fn autoslice_uneven_rows_fail() {
        // Span of 3 entries, 2 rows requested.
        let (mut store, handle) = make_store(&[(0, 0, 0), (5, 5, 5), (255, 255, 255)], true);
        let mut request = SortRequest::simple(ChannelSelector::Red);
        request.mode = SortMode::Autoslice;
        request.slice = ":2".into();

        let err = sort_palette(&mut store, &ctx(), handle, &request).unwrap_err();
        assert!(matches!(
            err,
            SortError::UnevenDivision { nrows: 2, span: 3 }
        ));
    }

    #[test]
    fn autoslice_bad_expression_falls_back_to_one_row() {
        let (mut store, handle) = make_store(&[(0, 0, 0), (9, 5, 5), (3, 5, 5), (255, 255, 255)], true);
        let mut request = SortRequest::simple(ChannelSelector::Red);
        request.mode = SortMode::Autoslice;
        request.slice = "not a slice".into();
        request.ascending = true;

        sort_palette(&mut store, &ctx(), handle, &request).unwrap();
        assert_eq!(reds(&store, handle), vec![0, 3, 9, 255]);
    }

    #[test]
    fn quantized_sort_preserves_order_within_buckets() {
        // Grain 256/2 = 128: reds 10/100/60 all land in bucket 0 and
        // keep their input order; 200 lands in bucket 128.
        let (mut store, handle) = make_store(
            &[(10, 0, 0), (200, 0, 0), (100, 0, 0), (60, 0, 0)],
            true,
        );
        let mut request = SortRequest::simple(ChannelSelector::Red);
        request.quantize = 2.0;
        request.ascending = true;

        sort_palette(&mut store, &ctx(), handle, &request).unwrap();
        assert_eq!(reds(&store, handle), vec![10, 100, 60, 200]);
    }

    #[test]
    fn index_channel_descending_reverses_palette() {
        let (mut store, handle) = make_store(&[(1, 0, 0), (2, 0, 0), (3, 0, 0)], true);
        let request = SortRequest::simple(ChannelSelector::Index);
        sort_palette(&mut store, &ctx(), handle, &request).unwrap();
        assert_eq!(reds(&store, handle), vec![3, 2, 1]);
    }

    #[test]
    fn empty_palette_sorts_to_empty() {
        let (mut store, handle) = make_store(&[], true);
        let request = SortRequest::simple(ChannelSelector::Red);
        let out = sort_palette(&mut store, &ctx(), handle, &request).unwrap();
        assert_eq!(store.count(out).unwrap(), 0);
    }
}
