// Minimal GoTrue admin API client (service-role key auth).
// https://github.com/supabase/auth — admin endpoints only.

pub mod models;

use reqwest::{header, Client};

use crate::models::{AdminUser, CreateUserBody, UpdateUserBody};

#[derive(Debug, Clone)]
pub struct GoTrueOptions {
    /// Base URL of the auth service, e.g. `https://auth.example.com`.
    pub base_url: String,
    /// Service-role key. Grants admin access; never expose to clients.
    pub service_role_key: String,
}

#[derive(Debug, Clone)]
pub struct GoTrueAdminService {
    options: GoTrueOptions,
    client: Client,
}

impl GoTrueAdminService {
    pub fn new(options: GoTrueOptions) -> Self {
        Self {
            options,
            client: Client::new(),
        }
    }

    fn headers(&self) -> header::HeaderMap {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            "apikey",
            self.options
                .service_role_key
                .parse()
                .expect("Header value should parse correctly"),
        );
        headers
    }

    /// Create a user via the admin API.
    ///
    /// With `email_confirm: true` the user is created already confirmed and no
    /// confirmation email is sent.
    pub async fn create_user(&self, body: CreateUserBody) -> Result<AdminUser, &'static str> {
        let url = format!("{}/admin/users", self.options.base_url);

        let res = self
            .client
            .post(url)
            .bearer_auth(&self.options.service_role_key)
            .headers(self.headers())
            .json(&body)
            .send()
            .await;

        match res {
            Ok(response) => {
                let status = response.status();
                if !status.is_success() {
                    let error_body = response.text().await.unwrap_or_default();
                    eprintln!("GoTrue error ({}): {}", status, error_body);
                    return Err("GoTrue returned an error");
                }

                match response.json::<AdminUser>().await {
                    Ok(user) => Ok(user),
                    Err(e) => {
                        eprintln!("Failed to parse GoTrue response: {}", e);
                        Err("Error parsing create-user response")
                    }
                }
            }
            Err(e) => {
                eprintln!("Request to GoTrue failed: {}", e);
                Err("Error creating user")
            }
        }
    }

    /// Update a user's email, password, or metadata. Absent fields are untouched.
    pub async fn update_user(
        &self,
        user_id: &str,
        body: UpdateUserBody,
    ) -> Result<AdminUser, &'static str> {
        let url = format!("{}/admin/users/{}", self.options.base_url, user_id);

        let res = self
            .client
            .put(url)
            .bearer_auth(&self.options.service_role_key)
            .headers(self.headers())
            .json(&body)
            .send()
            .await;

        match res {
            Ok(response) => {
                let status = response.status();
                if !status.is_success() {
                    let error_body = response.text().await.unwrap_or_default();
                    eprintln!("GoTrue error ({}): {}", status, error_body);
                    return Err("GoTrue returned an error");
                }

                match response.json::<AdminUser>().await {
                    Ok(user) => Ok(user),
                    Err(e) => {
                        eprintln!("Failed to parse GoTrue response: {}", e);
                        Err("Error parsing update-user response")
                    }
                }
            }
            Err(e) => {
                eprintln!("Request to GoTrue failed: {}", e);
                Err("Error updating user")
            }
        }
    }

    /// Delete a user. Succeeds if the provider confirms the deletion.
    pub async fn delete_user(&self, user_id: &str) -> Result<(), &'static str> {
        let url = format!("{}/admin/users/{}", self.options.base_url, user_id);

        let res = self
            .client
            .delete(url)
            .bearer_auth(&self.options.service_role_key)
            .headers(self.headers())
            .send()
            .await;

        match res {
            Ok(response) => {
                let status = response.status();
                if !status.is_success() {
                    let error_body = response.text().await.unwrap_or_default();
                    eprintln!("GoTrue error ({}): {}", status, error_body);
                    return Err("GoTrue returned an error");
                }
                Ok(())
            }
            Err(e) => {
                eprintln!("Request to GoTrue failed: {}", e);
                Err("Error deleting user")
            }
        }
    }
}
