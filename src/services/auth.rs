//! Credential exchange

use reqwest::Method;

use crate::client::{
    decode_json, ApiClient, ClientResult, Credentials, LoginResponse, MessageResponse,
};

/// Log in and store the returned token in the client's session
pub async fn login(client: &ApiClient, username: &str, password: &str) -> ClientResult<()> {
    let builder = client
        .request(Method::POST, "auth/login")
        .await
        .json(&Credentials { username, password });
    let response = client.send_credentials(builder).await?;
    let login: LoginResponse = decode_json(response).await?;

    client.session().set(login.access_token).await?;
    tracing::info!(username = %username, "Logged in");
    Ok(())
}

/// Create an account; returns the server's confirmation message
pub async fn register(
    client: &ApiClient,
    username: &str,
    password: &str,
) -> ClientResult<Option<String>> {
    let builder = client
        .request(Method::POST, "auth/register")
        .await
        .json(&Credentials { username, password });
    let response = client.send_credentials(builder).await?;
    let ack: MessageResponse = decode_json(response).await?;

    tracing::info!(username = %username, "Registered");
    Ok(ack.message)
}

/// Drop the stored token
pub async fn logout(client: &ApiClient) -> ClientResult<()> {
    client.session().clear().await?;
    Ok(())
}
