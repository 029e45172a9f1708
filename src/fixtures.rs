#[cfg(test)]
pub mod test {
    /// Two clients for the same project; the second one is the library's app.
    pub const TWO_CLIENTS: &str = r#"{
  "project_info": {
    "project_number": "123456789012",
    "firebase_url": "https://demo-project.firebaseio.com",
    "project_id": "demo-project",
    "storage_bucket": "demo-project.appspot.com"
  },
  "client": [
    {
      "client_info": {
        "mobilesdk_app_id": "1:123456789012:android:0000000000000000",
        "android_client_info": { "package_name": "com.example.other" }
      },
      "api_key": [ { "current_key": "other-key" } ]
    },
    {
      "client_info": {
        "mobilesdk_app_id": "1:123456789012:android:abcdef0123456789",
        "android_client_info": { "package_name": "com.example.app" }
      },
      "oauth_client": [],
      "api_key": [
        { "current_key": "app-key-1" },
        { "current_key": "app-key-2" }
      ]
    }
  ],
  "configuration_version": "1"
}"#;

    /// A single client without the optional project fields.
    pub const MINIMAL: &str = r#"{
  "project_info": { "project_id": "minimal-project" },
  "client": [
    {
      "client_info": {
        "mobilesdk_app_id": "1:1:android:1",
        "android_client_info": { "package_name": "com.example.app" }
      },
      "api_key": [ { "current_key": "minimal-key" } ]
    }
  ]
}"#;
}
