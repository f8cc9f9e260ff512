use super::*;

#[test]
fn internal_errors_map_to_500_with_generic_body() {
    let (status, Json(body)) = error_response(ApiError::internal("no such table: boards"));
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body.error, "Internal Server Error");
}

#[test]
fn validation_errors_map_to_400() {
    let (status, Json(body)) = error_response(ApiError::validation("bad lists"));
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body.error, "bad lists");
}

#[test]
fn unavailable_maps_to_503() {
    let (status, _) = error_response(ApiError::new(ErrorCode::Unavailable, "database unavailable"));
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

#[test]
fn payload_too_large_maps_to_413_with_message() {
    let (status, Json(body)) = error_response(ApiError::new(
        ErrorCode::PayloadTooLarge,
        "length limit exceeded",
    ));
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(body.error, "length limit exceeded");
}
