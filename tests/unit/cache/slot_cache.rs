use super::*;

fn shared(v: u8) -> SharedImage {
    SharedImage::new(PixelBuffer::filled(2, 2, [v, v, v, 255]).unwrap()).unwrap()
}

fn cache() -> SlotCache {
    SlotCache::new(shared(10), shared(20))
}

fn image(v: u8) -> PixelBuffer {
    PixelBuffer::filled(3, 3, [v, 0, 0, 255]).unwrap()
}

fn kinds(cache: &SlotCache) -> Vec<SlotKind> {
    (0..cache.len()).map(|i| cache.kind(i).unwrap()).collect()
}

#[test]
fn new_cache_is_all_empty() {
    let c = cache();
    assert_eq!(c.len(), SLOT_COUNT);
    assert_eq!(kinds(&c), vec![SlotKind::Empty; SLOT_COUNT]);
    assert_eq!(c.pending_count(), 0);
}

#[test]
fn populate_issues_min_of_slots_and_urls() {
    for count in 0..=SLOT_COUNT + 2 {
        let mut c = cache();
        let _ = c.reset();
        let urls: Vec<String> = (0..count).map(|i| format!("u{i}")).collect();
        let requests = c.populate(&urls);

        assert_eq!(requests.len(), count.min(SLOT_COUNT), "count={count}");
        for (i, req) in requests.iter().enumerate() {
            assert_eq!(req.token.slot(), i);
            assert_eq!(req.url, format!("u{i}"));
            assert_eq!(c.pending_token(i), Some(req.token));
        }
        if count > 0 {
            for i in count.min(SLOT_COUNT)..SLOT_COUNT {
                assert_eq!(c.kind(i), Some(SlotKind::Placeholder));
                assert_eq!(c.pending_token(i), None);
            }
        }
    }
}

#[test]
fn zero_urls_show_border_everywhere() {
    let mut c = cache();
    let _ = c.reset();
    let requests = c.populate::<&str>(&[]);
    assert!(requests.is_empty());
    assert_eq!(kinds(&c), vec![SlotKind::EmptyStackBorder; SLOT_COUNT]);

    let snap = c.snapshot();
    for view in &snap {
        assert!(
            view.image
                .as_ref()
                .unwrap()
                .same_pixels(c.empty_stack_border().view())
        );
    }
}

#[test]
fn success_loads_slot_and_clears_token() {
    let mut c = cache();
    let _ = c.reset();
    let reqs = c.populate(&["a", "b"]);

    assert_eq!(c.on_load_succeeded(reqs[1].token, image(1)), Delivery::Applied);
    assert_eq!(c.kind(1), Some(SlotKind::Loaded));
    assert_eq!(c.pending_token(1), None);
    assert_eq!(c.kind(0), Some(SlotKind::Placeholder));
    assert_eq!(c.pending_count(), 1);
}

#[test]
fn failure_keeps_placeholder() {
    let mut c = cache();
    let _ = c.reset();
    let reqs = c.populate(&["a"]);
    let failure = LoadFailure::Fetch("404".to_string());
    assert_eq!(c.on_load_failed(reqs[0].token, &failure), Delivery::Applied);
    assert_eq!(c.kind(0), Some(SlotKind::Placeholder));
    assert_eq!(c.pending_token(0), None);
}

#[test]
fn stale_success_from_superseded_populate_is_discarded() {
    let mut c = cache();
    let _ = c.reset();
    let t1 = c.populate(&["urlA"])[0].token;

    let report = c.reset();
    assert_eq!(report.cancelled, vec![t1]);
    let t2 = c.populate(&["urlB"])[0].token;
    assert_ne!(t1, t2);
    assert!(t2.serial() > t1.serial());

    assert_eq!(c.on_load_succeeded(t1, image(7)), Delivery::Stale);
    assert_eq!(c.kind(0), Some(SlotKind::Placeholder));
    assert_eq!(c.pending_token(0), Some(t2));

    // The newer token's result still lands, whichever order callbacks arrive in.
    assert_eq!(c.on_load_succeeded(t2, image(8)), Delivery::Applied);
    assert_eq!(c.kind(0), Some(SlotKind::Loaded));
}

#[test]
fn one_terminal_outcome_per_token() {
    let mut c = cache();
    let _ = c.reset();
    let t = c.populate(&["a"])[0].token;

    assert_eq!(c.on_load_succeeded(t, image(1)), Delivery::Applied);
    let failure = LoadFailure::Decode("late".to_string());
    assert_eq!(c.on_load_failed(t, &failure), Delivery::Stale);
    assert_eq!(c.kind(0), Some(SlotKind::Loaded));

    let _ = c.reset();
    let t = c.populate(&["b"])[0].token;
    assert_eq!(c.on_load_failed(t, &failure), Delivery::Applied);
    assert_eq!(c.on_load_succeeded(t, image(2)), Delivery::Stale);
    assert_eq!(c.kind(0), Some(SlotKind::Placeholder));
}

#[test]
fn reset_twice_releases_each_buffer_once() {
    let mut c = cache();
    let _ = c.reset();
    let reqs = c.populate(&["a", "b", "c"]);
    for (i, req) in reqs.iter().enumerate().take(2) {
        assert!(c.on_load_succeeded(req.token, image(i as u8)).is_applied());
    }

    let first = c.reset();
    assert_eq!(first.released, 2);
    assert_eq!(first.cancelled, vec![reqs[2].token]);
    assert_eq!(kinds(&c), vec![SlotKind::Placeholder; SLOT_COUNT]);

    let second = c.reset();
    assert_eq!(second, ResetReport::default());
    assert_eq!(kinds(&c), vec![SlotKind::Placeholder; SLOT_COUNT]);
}

#[test]
fn border_is_left_only_through_reset() {
    let mut c = cache();
    let _ = c.reset();
    let _ = c.populate::<&str>(&[]);
    assert_eq!(c.reset().released, 0);
    assert_eq!(kinds(&c), vec![SlotKind::Placeholder; SLOT_COUNT]);
}

#[test]
fn snapshot_keeps_pixels_after_release() {
    let mut c = cache();
    let _ = c.reset();
    let t = c.populate(&["a"])[0].token;
    assert!(c.on_load_succeeded(t, image(42)).is_applied());

    let snap = c.snapshot();
    let _ = c.reset();
    let view = snap[0].image.as_ref().unwrap();
    assert_eq!(&view.pixels()[0..4], &[42, 0, 0, 255]);
    assert_eq!(snap[0].kind, SlotKind::Loaded);
}

#[test]
fn recycled_buffer_yields_no_image_in_snapshot() {
    let mut c = cache();
    let _ = c.reset();
    let t = c.populate(&["a"])[0].token;
    let mut buf = image(1);
    buf.recycle();
    assert!(c.on_load_succeeded(t, buf).is_applied());
    let snap = c.snapshot();
    assert_eq!(snap[0].kind, SlotKind::Loaded);
    assert!(snap[0].image.is_none());
}

#[test]
fn placeholder_views_share_the_constant() {
    let mut c = cache();
    let _ = c.reset();
    let snap = c.snapshot();
    for view in &snap {
        assert!(
            view.image
                .as_ref()
                .unwrap()
                .same_pixels(c.placeholder().view())
        );
    }
}

#[test]
#[cfg(debug_assertions)]
#[should_panic(expected = "reset first")]
fn populate_over_pending_tokens_without_reset_panics() {
    let mut c = cache();
    let _ = c.reset();
    let _ = c.populate(&["a"]);
    let _ = c.populate::<&str>(&[]);
}

#[test]
fn reset_hands_back_every_pending_token() {
    let mut c = cache();
    let _ = c.reset();
    let reqs = c.populate(&["a", "b"]);
    let report = c.reset();
    let issued: Vec<LoadToken> = reqs.iter().map(|r| r.token).collect();
    assert_eq!(report.cancelled, issued);
    assert!(c.populate::<&str>(&[]).is_empty());
    assert_eq!(c.pending_count(), 0);
}
