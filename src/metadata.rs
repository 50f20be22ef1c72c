// Build-time package info generated by build.rs.
include!(concat!(env!("OUT_DIR"), "/pkg_info.rs"));
