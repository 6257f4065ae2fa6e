//! 카운트업 숫자 계산/포맷.
//!
//! 선형 보간과 천 단위 구분 포맷만 담당하며, 타이밍은 `animator`가 맡는다.

use std::time::Duration;
use tinystat_core::models::animation::CountOptions;
use tinystat_core::ports::animator::AnimationError;

/// `from`→`to` 선형 보간 (progress는 0.0~1.0으로 제한)
pub fn interpolate(from: u64, to: u64, progress: f64) -> f64 {
    let t = if progress.is_nan() {
        0.0
    } else {
        progress.clamp(0.0, 1.0)
    };
    let from = from as f64;
    let to = to as f64;
    from + (to - from) * t
}

/// 지속 시간 검증 및 변환
///
/// 음수, NaN, 무한대, `Duration`으로 표현할 수 없는 값은 거부한다.
pub fn validate_duration(duration_secs: f64) -> Result<Duration, AnimationError> {
    if !duration_secs.is_finite() || duration_secs < 0.0 {
        return Err(AnimationError::InvalidDuration(duration_secs));
    }
    Duration::try_from_secs_f64(duration_secs)
        .map_err(|_| AnimationError::InvalidDuration(duration_secs))
}

/// 정수 카운트 표시 문자열 (시작/끝 프레임용, f64를 거치지 않음)
pub fn format_count(value: u64, options: &CountOptions) -> String {
    let digits = value.to_string();
    let zeros = "0".repeat(options.decimals);
    let frac_part = (options.decimals > 0).then_some(zeros.as_str());
    assemble(false, &digits, frac_part, options)
}

/// 보간된 중간값 표시 문자열
///
/// `decimals` 자리로 반올림 → 정수부 천 단위 구분 → prefix/suffix 부착.
pub fn format_value(value: f64, options: &CountOptions) -> String {
    let fixed = format!("{:.*}", options.decimals, value.abs());
    // -0 같은 표시는 만들지 않음
    let negative = value < 0.0 && fixed.bytes().any(|b| b.is_ascii_digit() && b != b'0');
    match fixed.split_once('.') {
        Some((int_part, frac_part)) => assemble(negative, int_part, Some(frac_part), options),
        None => assemble(negative, &fixed, None, options),
    }
}

fn assemble(
    negative: bool,
    int_part: &str,
    frac_part: Option<&str>,
    options: &CountOptions,
) -> String {
    let mut out = String::with_capacity(int_part.len() + 16);
    if let Some(prefix) = &options.prefix {
        out.push_str(prefix);
    }
    if negative {
        out.push('-');
    }
    if options.use_grouping {
        out.push_str(&group_thousands(int_part, &options.separator));
    } else {
        out.push_str(int_part);
    }
    if let Some(frac) = frac_part {
        out.push_str(&options.decimal);
        out.push_str(frac);
    }
    if let Some(suffix) = &options.suffix {
        out.push_str(suffix);
    }
    out
}

fn group_thousands(digits: &str, separator: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + (len / 3) * separator.len());
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push_str(separator);
        }
        out.push(ch);
    }
    out
}
