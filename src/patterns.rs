//! Command patterns keying every message the gateway forwards to a
//! backend service. The `<domain>.<action>` string is the routing key;
//! there is no other dispatch metadata on the wire.

pub mod auth {
    pub const REGISTER: &str = "auth.register";
    pub const LOGIN: &str = "auth.login";
    pub const REFRESH_TOKEN: &str = "auth.refresh_token";
    pub const LOGOUT: &str = "auth.logout";
    pub const CHANGE_PASSWORD: &str = "auth.change_password";
    pub const VALIDATE_TOKEN: &str = "auth.validate_token";
}

pub mod users {
    pub const CREATE: &str = "users.create";
    pub const FIND_ALL: &str = "users.find_all";
    pub const FIND_BY_ID: &str = "users.find_by_id";
    pub const FIND_BY_EMAIL: &str = "users.find_by_email";
    pub const FIND_BY_USERNAME: &str = "users.find_by_username";
    pub const UPDATE: &str = "users.update";
    pub const DEACTIVATE: &str = "users.deactivate";
    pub const SEARCH: &str = "users.search";
    pub const GET_PROFILE: &str = "users.get_profile";
}

pub mod recipes {
    pub const CREATE: &str = "recipe.create";
    pub const FIND_ALL: &str = "recipe.find_all";
    pub const FIND_BY_ID: &str = "recipe.find_by_id";
    pub const FIND_BY_SLUG: &str = "recipe.find_by_slug";
    pub const FIND_BY_AUTHOR: &str = "recipe.find_by_author";
    pub const UPDATE: &str = "recipe.update";
    pub const DELETE: &str = "recipe.delete";
    pub const SEARCH: &str = "recipe.search";
}
