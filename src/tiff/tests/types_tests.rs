//! Tests for the TIFF types module

extern crate std;

use crate::io::byte_order::ByteOrder;
use crate::tiff::types::TIFF;
use crate::tiff::ifd::{IFD, IFDEntry};

#[test]
fn test_tiff_creation() {
    let tiff = TIFF::new(false, ByteOrder::LittleEndian);
    std::assert!(!tiff.is_big_tiff);
    std::assert_eq!(tiff.ifd_count(), 0);
    std::assert!(tiff.main_ifd().is_none());
}

#[test]
fn test_tiff_with_ifds() {
    let mut tiff = TIFF::new(true, ByteOrder::BigEndian);

    let mut main_ifd = IFD::new(0, 16);
    main_ifd.add_entry(IFDEntry::new(256, 4, 1, 1024));
    main_ifd.add_entry(IFDEntry::new(257, 4, 1, 768));
    tiff.ifds.push(main_ifd);

    // Reduced resolution subfile
    let mut overview_ifd = IFD::new(1, 100);
    overview_ifd.add_entry(IFDEntry::new(254, 4, 1, 1));
    overview_ifd.add_entry(IFDEntry::new(256, 4, 1, 512));
    overview_ifd.add_entry(IFDEntry::new(257, 4, 1, 384));
    tiff.ifds.push(overview_ifd);

    std::assert!(tiff.is_big_tiff);
    std::assert_eq!(tiff.byte_order, ByteOrder::BigEndian);
    std::assert_eq!(tiff.ifd_count(), 2);
    std::assert!(!tiff.main_ifd().unwrap().is_overview());

    let overviews = tiff.overviews();
    std::assert_eq!(overviews.len(), 1);
    std::assert_eq!(overviews[0].get_dimensions(), Some((512, 384)));
}

#[test]
fn test_ifd_defaults_for_missing_tags() {
    let mut ifd = IFD::new(0, 8);
    ifd.add_entry(IFDEntry::new(256, 4, 1, 10));

    std::assert_eq!(ifd.get_dimensions(), None);
    std::assert_eq!(ifd.get_samples_per_pixel(), 1);
    std::assert_eq!(ifd.get_compression(), 1);
    std::assert_eq!(ifd.get_predictor(), 1);
    std::assert_eq!(ifd.get_sample_format(), 1);
    std::assert!(!ifd.is_tiled());
}

#[test]
fn test_entry_inline_detection() {
    // Two SHORTs fit in a classic entry, three do not
    std::assert!(IFDEntry::new(258, 3, 2, 0).is_value_inline(false));
    std::assert!(!IFDEntry::new(258, 3, 3, 0).is_value_inline(false));
    // A DOUBLE is only inline in BigTIFF
    std::assert!(!IFDEntry::new(33550, 12, 1, 0).is_value_inline(false));
    std::assert!(IFDEntry::new(33550, 12, 1, 0).is_value_inline(true));
}
