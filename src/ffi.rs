//! FFI bindings for the vital trend engine
//!
//! C-compatible entry points for the front-end host application. All
//! functions use C strings (null-terminated) and return allocated memory
//! that must be freed by the caller using `vital_trend_free_string`.

use std::cell::RefCell;
use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::ptr;
use std::str::FromStr;

use chrono::NaiveDate;

use crate::report::TrendReportEncoder;
use crate::types::{DailyVitalsSummary, Demographics, TrendPeriod, VitalType};

// Thread-local storage for the last error message
thread_local! {
    static LAST_ERROR: RefCell<Option<CString>> = const { RefCell::new(None) };
}

/// Set the last error message
fn set_last_error(msg: &str) {
    LAST_ERROR.with(|e| {
        *e.borrow_mut() = CString::new(msg).ok();
    });
}

/// Clear the last error message
fn clear_last_error() {
    LAST_ERROR.with(|e| {
        *e.borrow_mut() = None;
    });
}

/// Helper to convert C string to Rust string
unsafe fn cstr_to_string(ptr: *const c_char) -> Option<String> {
    if ptr.is_null() {
        return None;
    }
    CStr::from_ptr(ptr).to_str().ok().map(|s| s.to_string())
}

/// Helper to convert Rust string to C string (caller must free)
fn string_to_cstr(s: &str) -> *mut c_char {
    match CString::new(s) {
        Ok(cstr) => cstr.into_raw(),
        Err(_) => ptr::null_mut(),
    }
}

/// Analyze a vital's history and return a `VitalTrendReport` as JSON.
///
/// `history_json` is a JSON array of daily summaries, `vital_id` and
/// `period_id` are the stable identifiers (e.g. "heart_rate", "month"),
/// `today` is the reference day as "YYYY-MM-DD", and `demographics_json`
/// is an optional JSON object (pass NULL for adult defaults).
///
/// # Safety
/// - All non-NULL pointers must be valid null-terminated C strings.
/// - Returns a newly allocated string that must be freed with
///   `vital_trend_free_string`.
/// - Returns NULL on error; call `vital_trend_last_error` for the message.
#[no_mangle]
pub unsafe extern "C" fn vital_trend_analyze(
    history_json: *const c_char,
    vital_id: *const c_char,
    period_id: *const c_char,
    today: *const c_char,
    demographics_json: *const c_char,
) -> *mut c_char {
    clear_last_error();

    let history_str = match cstr_to_string(history_json) {
        Some(s) => s,
        None => {
            set_last_error("Invalid history JSON pointer");
            return ptr::null_mut();
        }
    };

    let vital_str = match cstr_to_string(vital_id) {
        Some(s) => s,
        None => {
            set_last_error("Invalid vital id pointer");
            return ptr::null_mut();
        }
    };

    let period_str = match cstr_to_string(period_id) {
        Some(s) => s,
        None => {
            set_last_error("Invalid period id pointer");
            return ptr::null_mut();
        }
    };

    let today_str = match cstr_to_string(today) {
        Some(s) => s,
        None => {
            set_last_error("Invalid today pointer");
            return ptr::null_mut();
        }
    };

    let vital = match VitalType::from_str(&vital_str) {
        Ok(v) => v,
        Err(e) => {
            set_last_error(&e.to_string());
            return ptr::null_mut();
        }
    };

    let period = match TrendPeriod::from_str(&period_str) {
        Ok(p) => p,
        Err(e) => {
            set_last_error(&e.to_string());
            return ptr::null_mut();
        }
    };

    let today_date = match NaiveDate::parse_from_str(&today_str, "%Y-%m-%d") {
        Ok(d) => d,
        Err(e) => {
            set_last_error(&format!("Date parse error: {e}"));
            return ptr::null_mut();
        }
    };

    let history: Vec<DailyVitalsSummary> = match serde_json::from_str(&history_str) {
        Ok(h) => h,
        Err(e) => {
            set_last_error(&format!("Invalid history JSON: {e}"));
            return ptr::null_mut();
        }
    };

    let demographics = match cstr_to_string(demographics_json) {
        Some(s) => match serde_json::from_str::<Demographics>(&s) {
            Ok(d) => d,
            Err(e) => {
                set_last_error(&format!("Invalid demographics JSON: {e}"));
                return ptr::null_mut();
            }
        },
        None => Demographics::adult(),
    };

    let encoder = TrendReportEncoder::new();
    match encoder.evaluate_to_json(&history, vital, period, &demographics, today_date) {
        Ok(json) => string_to_cstr(&json),
        Err(e) => {
            set_last_error(&e.to_string());
            ptr::null_mut()
        }
    }
}

/// Format a value for display using the vital's unit and decimal places.
///
/// Non-finite values render as the placeholder, never fail.
///
/// # Safety
/// - `vital_id` must be a valid null-terminated C string.
/// - Returns a newly allocated string that must be freed with
///   `vital_trend_free_string`, or NULL on an unknown vital id.
#[no_mangle]
pub unsafe extern "C" fn vital_trend_format(vital_id: *const c_char, value: f64) -> *mut c_char {
    clear_last_error();

    let vital_str = match cstr_to_string(vital_id) {
        Some(s) => s,
        None => {
            set_last_error("Invalid vital id pointer");
            return ptr::null_mut();
        }
    };

    match VitalType::from_str(&vital_str) {
        Ok(vital) => string_to_cstr(&crate::catalog::format_value(vital, value)),
        Err(e) => {
            set_last_error(&e.to_string());
            ptr::null_mut()
        }
    }
}

/// Get the last error message, or NULL if there was no error.
///
/// # Safety
/// - The returned pointer is valid until the next engine call on this
///   thread. Do not free it.
#[no_mangle]
pub unsafe extern "C" fn vital_trend_last_error() -> *const c_char {
    LAST_ERROR.with(|e| match &*e.borrow() {
        Some(cstr) => cstr.as_ptr(),
        None => ptr::null(),
    })
}

/// Free a string allocated by this library.
///
/// # Safety
/// - `ptr` must have been returned by a `vital_trend_*` function and not
///   freed before. NULL is a no-op.
#[no_mangle]
pub unsafe extern "C" fn vital_trend_free_string(ptr: *mut c_char) {
    if !ptr.is_null() {
        drop(CString::from_raw(ptr));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c_string(s: &str) -> CString {
        CString::new(s).unwrap()
    }

    fn sample_history_json() -> String {
        let history: Vec<DailyVitalsSummary> = (0..30)
            .map(|i| {
                let date = NaiveDate::from_ymd_opt(2024, 9, 1).unwrap()
                    + chrono::Duration::days(i);
                DailyVitalsSummary::single(date, VitalType::HeartRate, 70.0 + i as f64 * 0.5)
            })
            .collect();
        serde_json::to_string(&history).unwrap()
    }

    #[test]
    fn test_analyze_round_trip() {
        let history = c_string(&sample_history_json());
        let vital = c_string("heart_rate");
        let period = c_string("month");
        let today = c_string("2024-09-30");

        let result = unsafe {
            vital_trend_analyze(
                history.as_ptr(),
                vital.as_ptr(),
                period.as_ptr(),
                today.as_ptr(),
                ptr::null(),
            )
        };
        assert!(!result.is_null());

        let json = unsafe { CStr::from_ptr(result) }.to_str().unwrap();
        let parsed: serde_json::Value = serde_json::from_str(json).unwrap();
        assert_eq!(parsed["vital"], "heart_rate");
        assert_eq!(parsed["trend"]["direction"], "rising");

        unsafe { vital_trend_free_string(result) };
    }

    #[test]
    fn test_unknown_vital_sets_last_error() {
        let history = c_string("[]");
        let vital = c_string("blood_glucose");
        let period = c_string("week");
        let today = c_string("2024-09-30");

        let result = unsafe {
            vital_trend_analyze(
                history.as_ptr(),
                vital.as_ptr(),
                period.as_ptr(),
                today.as_ptr(),
                ptr::null(),
            )
        };
        assert!(result.is_null());

        let err = unsafe { vital_trend_last_error() };
        assert!(!err.is_null());
        let msg = unsafe { CStr::from_ptr(err) }.to_str().unwrap();
        assert!(msg.contains("blood_glucose"));
    }

    #[test]
    fn test_null_history_is_an_error() {
        let vital = c_string("heart_rate");
        let period = c_string("week");
        let today = c_string("2024-09-30");

        let result = unsafe {
            vital_trend_analyze(
                ptr::null(),
                vital.as_ptr(),
                period.as_ptr(),
                today.as_ptr(),
                ptr::null(),
            )
        };
        assert!(result.is_null());
    }

    #[test]
    fn test_format_over_ffi() {
        let vital = c_string("body_weight");
        let result = unsafe { vital_trend_format(vital.as_ptr(), 70.25) };
        assert!(!result.is_null());
        let s = unsafe { CStr::from_ptr(result) }.to_str().unwrap();
        assert_eq!(s, "70.2 kg");
        unsafe { vital_trend_free_string(result) };
    }
}
