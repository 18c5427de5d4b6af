/// Maps `?notice=` codes to the banner text shown on the next page load.
/// Rejection codes come from the service layer; the rest are success
/// notices set by handlers after a redirect.
pub fn text(code: &str) -> Option<&'static str> {
    let message = match code {
        // successes
        "created" => "Activity created; it is now waiting for review.",
        "updated" => "Activity updated.",
        "deleted" => "Activity deleted.",
        "joined" => "You have joined the activity.",
        "quit" => "You have left the activity.",
        "commented" => "Comment posted.",
        "reviewed" => "Review recorded.",
        "registered" => "Account created; you can sign in now.",
        "logged_out" => "You have been signed out.",
        "role_updated" => "User role updated.",
        "venue_created" => "Venue created.",
        "venue_updated" => "Venue updated.",
        "venue_deleted" => "Venue deleted.",
        "type_created" => "Activity type created.",
        "type_updated" => "Activity type updated.",
        "type_deleted" => "Activity type deleted.",
        // rejections
        "end_before_start" => "The end time must be after the start time.",
        "bad_time" => "Could not read the start or end time.",
        "title_required" => "A title is required.",
        "description_required" => "A description is required.",
        "bad_capacity" => "The number of participants must be a positive number.",
        "venue_missing" => "The selected venue does not exist.",
        "type_missing" => "The selected activity type does not exist.",
        "over_capacity" => "The participant limit exceeds the venue capacity.",
        "venue_conflict" => "The venue is already booked for that time slot.",
        "below_current" => "The participant limit cannot drop below current sign-ups.",
        "registration_closed" => "Registration is closed for this activity.",
        "activity_full" => "This activity is already full.",
        "already_joined" => "You have already joined this activity.",
        "not_joined" => "You have not joined this activity.",
        "empty_comment" => "A comment cannot be empty.",
        "username_length" => "The username must be 4 to 20 characters long.",
        "invalid_email" => "Please enter a valid email address.",
        "password_length" => "The password must be at least 6 characters long.",
        "password_mismatch" => "The passwords do not match.",
        "department_required" => "A department is required.",
        "username_taken" => "That username is already taken.",
        "email_taken" => "That email address is already registered.",
        "bad_credentials" => "Incorrect username or password.",
        "self_role_change" => "You cannot change your own role.",
        "bad_role" => "Unknown role.",
        "name_required" => "A name is required.",
        "address_required" => "An address is required.",
        "name_taken" => "That name is already in use.",
        "venue_in_use" => "The venue still has activities attached to it.",
        "type_in_use" => "The activity type still has activities attached to it.",
        "review_decided" => "This activity has already been reviewed.",
        "bad_decision" => "Unknown review decision.",
        "not_exportable" => "Data export opens one week after the activity ends.",
        _ => return None,
    };
    Some(message)
}
