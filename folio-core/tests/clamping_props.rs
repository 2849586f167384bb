//! Property tests for progress and settings clamping

use folio_core::types::{
    AUTO_SCROLL_MAX, FONT_SIZE_MAX, FONT_SIZE_MIN, LINE_HEIGHT_MAX, LINE_HEIGHT_MIN, ZOOM_MAX,
    ZOOM_MIN,
};
use folio_core::{
    MockSource, NullRenderer, ReaderSession, ReaderSettings, SessionConfig, SettingsPatch,
    WorkKind, WorkRef,
};
use proptest::prelude::*;
use std::sync::Arc;

fn session(work: WorkRef) -> ReaderSession {
    ReaderSession::open(
        work,
        Arc::new(MockSource::default()),
        Arc::new(NullRenderer),
        SessionConfig::default(),
    )
}

proptest! {
    #[test]
    fn progress_always_within_bounds(percent in proptest::num::f64::ANY) {
        let session = session(WorkRef::manga("m1"));
        let stored = session.update_progress(percent);

        prop_assert!((0.0..=100.0).contains(&stored));
        prop_assert_eq!(session.progress(), stored);
        if !percent.is_nan() {
            prop_assert_eq!(stored, percent.clamp(0.0, 100.0));
        }
    }

    #[test]
    fn manga_zoom_always_within_bounds(zoom in any::<i64>()) {
        let mut settings = ReaderSettings::defaults_for(WorkKind::Manga);
        settings.apply(&SettingsPatch::new().with_zoom(zoom));

        let zoom_after = settings.as_manga().map(|m| m.zoom).unwrap_or_default();
        prop_assert!((ZOOM_MIN..=ZOOM_MAX).contains(&zoom_after));
    }

    #[test]
    fn novel_typography_always_within_bounds(
        font_size in any::<i64>(),
        line_height in proptest::num::f64::ANY,
    ) {
        let mut settings = ReaderSettings::defaults_for(WorkKind::Novel);
        settings.apply(
            &SettingsPatch::new()
                .with_font_size(font_size)
                .with_line_height(line_height),
        );

        let novel = *settings.as_novel().unwrap();
        prop_assert!((FONT_SIZE_MIN..=FONT_SIZE_MAX).contains(&novel.font_size));
        prop_assert!((LINE_HEIGHT_MIN..=LINE_HEIGHT_MAX).contains(&novel.line_height));
    }

    #[test]
    fn auto_scroll_speed_always_within_bounds(speed in any::<i64>()) {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .build()
            .unwrap();
        let _guard = runtime.enter();

        let session = session(WorkRef::novel("n1"));
        session.set_auto_scroll(speed);
        prop_assert!(session.auto_scroll_speed() <= AUTO_SCROLL_MAX);
        prop_assert_eq!(
            session.auto_scroll_speed(),
            speed.clamp(0, i64::from(AUTO_SCROLL_MAX)) as u8
        );
    }
}
