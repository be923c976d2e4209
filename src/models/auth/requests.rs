use serde::Deserialize;
use ts_rs::TS;

// 用户登录请求（来自HTTP请求）
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../bindings/auth.ts")]
pub struct LoginRequest {
    /// 用户名或邮箱
    pub username: String,
    /// 密码
    pub password: String,
    /// 是否记住我
    #[serde(default)]
    pub remember_me: bool,
}

// 找回密码：申请验证码
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../bindings/auth.ts")]
pub struct ForgetPasswordRequest {
    pub email: String,
}

// 找回密码：校验验证码
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../bindings/auth.ts")]
pub struct VerifyOtpRequest {
    pub email: String,
    pub otp: String,
}

// 找回密码：重置密码
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../bindings/auth.ts")]
pub struct ResetPasswordRequest {
    pub email: String,
    pub otp: String,
    pub new_password: String,
    pub confirm_password: String,
}
